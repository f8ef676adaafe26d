//! Field Balance Calculator
//!
//! Supply plus degradation for a single field. The calculation is a pure,
//! synchronous function of its explicit inputs so that a cache can key on
//! those inputs; errors are returned to the caller, not swallowed here.

use crate::cache::{Cache, FieldCacheKey};
use crate::catalog::Catalog;
use crate::degradation::{calculate_organic_matter_degradation, OrganicMatterDegradation};
use crate::error::BalanceError;
use crate::projection::{project_field_balance, OrganicMatterBalanceFieldNumeric};
use crate::soil::{combine_soil_analyses, SoilParameter};
use crate::supply::{calculate_organic_matter_supply, OrganicMatterSupply};
use crate::types::{FieldInput, TimeFrame};
use rust_decimal::Decimal;
use serde::Serialize;

/// Soil parameters the balance needs
pub const BALANCE_SOIL_PARAMETERS: [SoilParameter; 3] = [
    SoilParameter::OrganicMatterLoi,
    SoilParameter::BulkDensity,
    SoilParameter::SoilType,
];

/// Balance of one field, kg OM/ha
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganicMatterBalanceField {
    pub id: String,
    /// supply.total + degradation.total
    pub balance: Decimal,
    pub supply: OrganicMatterSupply,
    pub degradation: OrganicMatterDegradation,
}

impl OrganicMatterBalanceField {
    /// All-zero balance, used for buffer strips
    pub fn zero(id: &str) -> Self {
        Self {
            id: id.to_string(),
            balance: Decimal::ZERO,
            supply: OrganicMatterSupply::default(),
            degradation: OrganicMatterDegradation::default(),
        }
    }
}

/// Calculate the decimal balance of one field
pub fn calculate_field_balance(
    field: &FieldInput,
    catalog: &Catalog,
    time_frame: &TimeFrame,
) -> Result<OrganicMatterBalanceField, BalanceError> {
    if field.field.is_buffer_strip {
        return Ok(OrganicMatterBalanceField::zero(&field.field.id));
    }

    if time_frame.end < time_frame.start {
        return Err(BalanceError::InvalidTimeFrame {
            start: time_frame.start,
            end: time_frame.end,
        });
    }

    let soil = combine_soil_analyses(&field.soil_analyses, &BALANCE_SOIL_PARAMETERS, true)?;
    let supply = calculate_organic_matter_supply(field, catalog, time_frame)?;
    let degradation =
        calculate_organic_matter_degradation(&soil, &field.cultivations, catalog, time_frame);

    Ok(OrganicMatterBalanceField {
        id: field.field.id.clone(),
        balance: supply.total + degradation.total,
        supply,
        degradation,
    })
}

/// Calculate the balance of one field, projected to plain numbers
pub fn calculate_organic_matter_balance_field(
    field: &FieldInput,
    catalog: &Catalog,
    time_frame: &TimeFrame,
) -> Result<OrganicMatterBalanceFieldNumeric, BalanceError> {
    calculate_field_balance(field, catalog, time_frame)
        .map(|balance| project_field_balance(&balance))
}

/// Field balance through a cache keyed on calculator version and inputs
pub async fn calculate_organic_matter_balance_field_cached(
    cache: &dyn Cache<FieldCacheKey, OrganicMatterBalanceFieldNumeric>,
    calculator_version: &str,
    field: &FieldInput,
    catalog: &Catalog,
    time_frame: &TimeFrame,
) -> Result<OrganicMatterBalanceFieldNumeric, BalanceError> {
    let key = FieldCacheKey::new(calculator_version, catalog, field, time_frame);
    let compute = Box::pin(async move {
        calculate_organic_matter_balance_field(field, catalog, time_frame)
    });
    cache.get_or_compute(key, compute).await
}
