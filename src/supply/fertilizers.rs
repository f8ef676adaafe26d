//! Fertilizer supply
//!
//! EOM per application = amount (kg/ha) × EOM content (g/kg) / 1000,
//! bucketed by product category.

use super::SupplyContribution;
use crate::catalog::Catalog;
use crate::error::BalanceError;
use crate::types::{FertilizerApplication, FertilizerType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// EOM supplied by one fertilizer category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FertilizerBucket {
    pub total: Decimal,
    pub applications: Vec<SupplyContribution>,
}

impl FertilizerBucket {
    fn add(&mut self, id: &str, value: Decimal) {
        self.total += value;
        self.applications.push(SupplyContribution {
            id: id.to_string(),
            value,
        });
    }
}

/// EOM supplied by fertilizer applications, kg EOM/ha
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FertilizerSupply {
    pub total: Decimal,
    pub manure: FertilizerBucket,
    pub compost: FertilizerBucket,
    pub other: FertilizerBucket,
}

/// Calculate EOM supply from fertilizer applications
///
/// An application whose catalog entry is missing is a data-integrity error.
/// Products without an EOM content (mineral fertilizers) contribute nothing.
pub fn calculate_fertilizer_supply(
    applications: &[FertilizerApplication],
    catalog: &Catalog,
) -> Result<FertilizerSupply, BalanceError> {
    let mut supply = FertilizerSupply::default();

    for application in applications {
        let detail = catalog.fertilizer(&application.catalogue_id).ok_or_else(|| {
            BalanceError::MissingFertilizerDetail {
                application_id: application.id.clone(),
                catalogue_id: application.catalogue_id.clone(),
            }
        })?;

        let Some(eom) = detail.eom else {
            continue;
        };

        // g EOM/kg product × kg product/ha -> kg EOM/ha
        let value = application.amount * eom / dec!(1000);

        let bucket = match detail.fertilizer_type {
            Some(FertilizerType::Manure) => &mut supply.manure,
            Some(FertilizerType::Compost) => &mut supply.compost,
            _ => &mut supply.other,
        };
        bucket.add(&application.id, value);
    }

    supply.total = supply.manure.total + supply.compost.total + supply.other.total;

    Ok(supply)
}
