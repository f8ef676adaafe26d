//! Error types for balance calculations
//!
//! Any of these is fatal to a single field's calculation. The farm aggregator
//! turns them into per-field error messages instead of propagating them.

use crate::soil::SoilParameter;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BalanceError {
    #[error("Missing required soil parameters: {}", join_parameters(.parameters))]
    MissingSoilParameters { parameters: Vec<SoilParameter> },

    #[error(
        "Fertilizer application {application_id} references unknown catalogue entry {catalogue_id}"
    )]
    MissingFertilizerDetail {
        application_id: String,
        catalogue_id: String,
    },

    #[error("Failed to calculate organic matter supply: {0}")]
    SupplyCalculation(#[source] Box<BalanceError>),

    #[error("Time frame ends ({end}) before it starts ({start})")]
    InvalidTimeFrame { start: NaiveDate, end: NaiveDate },
}

impl BalanceError {
    pub(crate) fn supply(cause: BalanceError) -> Self {
        BalanceError::SupplyCalculation(Box::new(cause))
    }
}

fn join_parameters(parameters: &[SoilParameter]) -> String {
    parameters
        .iter()
        .map(|p| p.code())
        .collect::<Vec<_>>()
        .join(", ")
}
