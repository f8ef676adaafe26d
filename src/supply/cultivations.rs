//! Cultivation supply
//!
//! The catalog EOM of a crop is already an annual kg EOM/ha figure and is
//! added as-is, regardless of how long the crop stood on the field.

use super::SupplyContribution;
use crate::catalog::Catalog;
use crate::types::Cultivation;
use rust_decimal::Decimal;
use serde::Serialize;

/// EOM supplied by the crops, kg EOM/ha
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CultivationSupply {
    pub total: Decimal,
    pub cultivations: Vec<SupplyContribution>,
}

/// Calculate EOM supply from the crops themselves
///
/// Cultivations without catalog entry or without (nonzero) EOM add nothing.
pub fn calculate_cultivation_supply(
    cultivations: &[Cultivation],
    catalog: &Catalog,
) -> CultivationSupply {
    let mut supply = CultivationSupply::default();

    for cultivation in cultivations {
        let eom = catalog
            .cultivation(&cultivation.catalogue_id)
            .and_then(|detail| detail.eom)
            .filter(|eom| !eom.is_zero());

        if let Some(value) = eom {
            supply.total += value;
            supply.cultivations.push(SupplyContribution {
                id: cultivation.id.clone(),
                value,
            });
        }
    }

    supply
}
