//! Numeric Projection
//!
//! Converts the decimal result trees into plain numbers for renderers and
//! other consumers. Every computed value is rounded to the nearest integer
//! (midpoints away from zero) at this boundary; field areas are input echoes
//! and pass through unrounded.
//!
//! Totals and subtotals are rounded independently, so a projected total may
//! differ from the sum of its projected subtotals by up to one per subtotal.

use crate::degradation::OrganicMatterDegradation;
use crate::field::OrganicMatterBalanceField;
use crate::supply::{
    CultivationSupply, FertilizerBucket, FertilizerSupply, OrganicMatterSupply, ResidueSupply,
    SupplyContribution,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

// ============================================================================
// Numeric result types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyContributionNumeric {
    pub id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FertilizerBucketNumeric {
    pub total: f64,
    pub applications: Vec<SupplyContributionNumeric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FertilizerSupplyNumeric {
    pub total: f64,
    pub manure: FertilizerBucketNumeric,
    pub compost: FertilizerBucketNumeric,
    pub other: FertilizerBucketNumeric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CultivationSupplyNumeric {
    pub total: f64,
    pub cultivations: Vec<SupplyContributionNumeric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidueSupplyNumeric {
    pub total: f64,
    pub cultivations: Vec<SupplyContributionNumeric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicMatterSupplyNumeric {
    pub total: f64,
    pub fertilizers: FertilizerSupplyNumeric,
    pub cultivations: CultivationSupplyNumeric,
    pub residues: ResidueSupplyNumeric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicMatterDegradationNumeric {
    pub total: f64,
}

/// Balance of one field, kg OM/ha
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicMatterBalanceFieldNumeric {
    pub id: String,
    pub balance: f64,
    pub supply: OrganicMatterSupplyNumeric,
    pub degradation: OrganicMatterDegradationNumeric,
}

/// Outcome of one field's calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome {
    Balance(OrganicMatterBalanceFieldNumeric),
    Error { message: String },
}

/// Per-field entry of the farm result; identity is kept whatever the outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicMatterBalanceFieldResultNumeric {
    pub id: String,
    pub area: f64,
    pub is_buffer_strip: bool,
    pub outcome: FieldOutcome,
}

impl OrganicMatterBalanceFieldResultNumeric {
    pub fn balance(&self) -> Option<&OrganicMatterBalanceFieldNumeric> {
        match &self.outcome {
            FieldOutcome::Balance(balance) => Some(balance),
            FieldOutcome::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            FieldOutcome::Balance(_) => None,
            FieldOutcome::Error { message } => Some(message),
        }
    }
}

/// Farm-level result; aggregates are area-weighted kg OM/ha
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicMatterBalanceNumeric {
    pub balance: f64,
    pub supply: f64,
    pub degradation: f64,
    pub fields: Vec<OrganicMatterBalanceFieldResultNumeric>,
    pub has_errors: bool,
    pub field_error_messages: Vec<String>,
}

// ============================================================================
// Projection
// ============================================================================

/// Round to the nearest integer and convert
pub fn to_number(value: Decimal) -> f64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return 0.0;
    }
    rounded.to_f64().unwrap_or(0.0)
}

/// Convert without rounding (input echoes such as area)
pub fn to_number_exact(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn project_contributions(contributions: &[SupplyContribution]) -> Vec<SupplyContributionNumeric> {
    contributions
        .iter()
        .map(|c| SupplyContributionNumeric {
            id: c.id.clone(),
            value: to_number(c.value),
        })
        .collect()
}

fn project_bucket(bucket: &FertilizerBucket) -> FertilizerBucketNumeric {
    FertilizerBucketNumeric {
        total: to_number(bucket.total),
        applications: project_contributions(&bucket.applications),
    }
}

fn project_fertilizers(supply: &FertilizerSupply) -> FertilizerSupplyNumeric {
    FertilizerSupplyNumeric {
        total: to_number(supply.total),
        manure: project_bucket(&supply.manure),
        compost: project_bucket(&supply.compost),
        other: project_bucket(&supply.other),
    }
}

fn project_cultivations(supply: &CultivationSupply) -> CultivationSupplyNumeric {
    CultivationSupplyNumeric {
        total: to_number(supply.total),
        cultivations: project_contributions(&supply.cultivations),
    }
}

fn project_residues(supply: &ResidueSupply) -> ResidueSupplyNumeric {
    ResidueSupplyNumeric {
        total: to_number(supply.total),
        cultivations: project_contributions(&supply.cultivations),
    }
}

pub fn project_supply(supply: &OrganicMatterSupply) -> OrganicMatterSupplyNumeric {
    OrganicMatterSupplyNumeric {
        total: to_number(supply.total),
        fertilizers: project_fertilizers(&supply.fertilizers),
        cultivations: project_cultivations(&supply.cultivations),
        residues: project_residues(&supply.residues),
    }
}

pub fn project_degradation(
    degradation: &OrganicMatterDegradation,
) -> OrganicMatterDegradationNumeric {
    OrganicMatterDegradationNumeric {
        total: to_number(degradation.total),
    }
}

/// Field-level projection
pub fn project_field_balance(
    field: &OrganicMatterBalanceField,
) -> OrganicMatterBalanceFieldNumeric {
    OrganicMatterBalanceFieldNumeric {
        id: field.id.clone(),
        balance: to_number(field.balance),
        supply: project_supply(&field.supply),
        degradation: project_degradation(&field.degradation),
    }
}
