//! Organic Matter Supply
//!
//! Three independent sources of effective organic matter (EOM), each in its
//! own module:
//! - `fertilizers`: Applied manure, compost and other products
//! - `cultivations`: The crops themselves
//! - `residues`: Crop residues left on the field
//!
//! The coordinator below only adds them up.

pub mod fertilizers;
pub mod cultivations;
pub mod residues;

pub use fertilizers::{calculate_fertilizer_supply, FertilizerBucket, FertilizerSupply};
pub use cultivations::{calculate_cultivation_supply, CultivationSupply};
pub use residues::{calculate_residue_supply, ResidueSupply};

use crate::catalog::Catalog;
use crate::error::BalanceError;
use crate::types::{FieldInput, TimeFrame};
use rust_decimal::Decimal;
use serde::Serialize;

/// EOM contributed by one application or cultivation, kg EOM/ha
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyContribution {
    pub id: String,
    pub value: Decimal,
}

/// Total EOM supply of a field, kg EOM/ha
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganicMatterSupply {
    /// Always fertilizers.total + cultivations.total + residues.total
    pub total: Decimal,
    pub fertilizers: FertilizerSupply,
    pub cultivations: CultivationSupply,
    pub residues: ResidueSupply,
}

/// Calculate the EOM supply of a field from all three sources
///
/// Any failure is reported as a supply-stage error wrapping the original cause.
pub fn calculate_organic_matter_supply(
    field: &FieldInput,
    catalog: &Catalog,
    time_frame: &TimeFrame,
) -> Result<OrganicMatterSupply, BalanceError> {
    let fertilizers = calculate_fertilizer_supply(&field.fertilizer_applications, catalog)
        .map_err(BalanceError::supply)?;
    let cultivations = calculate_cultivation_supply(&field.cultivations, catalog);
    let residues = calculate_residue_supply(&field.cultivations, catalog, time_frame);

    let total: Decimal = fertilizers.total + cultivations.total + residues.total;

    Ok(OrganicMatterSupply {
        total,
        fertilizers,
        cultivations,
        residues,
    })
}
