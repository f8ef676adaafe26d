//! Farm Aggregator - Main coordinator for farm-level organic matter balances
//!
//! Evaluates every field through the cached field calculator in sequential
//! batches; the fields within a batch run concurrently. A failing field is
//! recorded on its own result and never aborts the batch or the farm. The
//! area-weighted farm figures only include healthy, non-buffer-strip fields.

use crate::cache::{Cache, FieldCacheKey, NoCache};
use crate::catalog::Catalog;
use crate::config::BalanceConfig;
use crate::field::calculate_organic_matter_balance_field_cached;
use crate::projection::{
    to_number, to_number_exact, FieldOutcome, OrganicMatterBalanceFieldNumeric,
    OrganicMatterBalanceFieldResultNumeric, OrganicMatterBalanceNumeric,
};
use crate::types::{FieldInput, OrganicMatterBalanceInput, TimeFrame};
use futures::future::join_all;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Farm-level balance before projection; aggregates in kg OM/ha
#[derive(Debug, Clone, PartialEq)]
pub struct OrganicMatterBalance {
    pub balance: Decimal,
    pub supply: Decimal,
    pub degradation: Decimal,
    pub fields: Vec<OrganicMatterBalanceFieldResultNumeric>,
    pub has_errors: bool,
    pub field_error_messages: Vec<String>,
}

/// Calculate the organic matter balance of a farm
///
/// Output field order follows input order.
pub async fn calculate_organic_matter_balance(
    input: &OrganicMatterBalanceInput,
    cache: &dyn Cache<FieldCacheKey, OrganicMatterBalanceFieldNumeric>,
    config: &BalanceConfig,
) -> OrganicMatterBalanceNumeric {
    let catalog = Catalog::new(&input.fertilizer_details, &input.cultivation_details);
    let batch_size = config.batch_size.max(1);

    tracing::info!(
        "Calculating organic matter balance for {} fields ({} batches of up to {})",
        input.fields.len(),
        input.fields.len().div_ceil(batch_size),
        batch_size
    );

    let mut results = Vec::with_capacity(input.fields.len());
    for (batch_index, batch) in input.fields.chunks(batch_size).enumerate() {
        tracing::debug!("Batch {} with {} fields", batch_index + 1, batch.len());

        let tasks = batch.iter().map(|field| {
            evaluate_field(
                field,
                &catalog,
                &input.time_frame,
                cache,
                &config.calculator_version,
            )
        });
        results.extend(join_all(tasks).await);
    }

    let balance = aggregate_fields(&input.fields, results);

    tracing::info!(
        "Organic matter balance: {} fields, {} errors",
        balance.fields.len(),
        balance.field_error_messages.len()
    );

    project_farm_balance(balance)
}

/// Same as `calculate_organic_matter_balance`, without caching and with default settings
pub async fn calculate_organic_matter_balance_uncached(
    input: &OrganicMatterBalanceInput,
) -> OrganicMatterBalanceNumeric {
    calculate_organic_matter_balance(input, &NoCache, &BalanceConfig::default()).await
}

/// Run one field and fold any failure into its result
async fn evaluate_field(
    field: &FieldInput,
    catalog: &Catalog,
    time_frame: &TimeFrame,
    cache: &dyn Cache<FieldCacheKey, OrganicMatterBalanceFieldNumeric>,
    calculator_version: &str,
) -> OrganicMatterBalanceFieldResultNumeric {
    let outcome = match calculate_organic_matter_balance_field_cached(
        cache,
        calculator_version,
        field,
        catalog,
        time_frame,
    )
    .await
    {
        Ok(balance) => FieldOutcome::Balance(balance),
        Err(err) => {
            tracing::warn!("Organic matter balance failed for field {}: {}", field.field.id, err);
            FieldOutcome::Error {
                message: err.to_string(),
            }
        }
    };

    OrganicMatterBalanceFieldResultNumeric {
        id: field.field.id.clone(),
        area: to_number_exact(field.field.area),
        is_buffer_strip: field.field.is_buffer_strip,
        outcome,
    }
}

/// Area-weighted farm figures over healthy, non-buffer-strip fields
///
/// `fields` and `results` are parallel; areas come from the decimal input.
pub fn aggregate_fields(
    fields: &[FieldInput],
    results: Vec<OrganicMatterBalanceFieldResultNumeric>,
) -> OrganicMatterBalance {
    let field_error_messages: Vec<String> = results
        .iter()
        .filter_map(|r| r.error_message().map(str::to_string))
        .collect();
    let has_errors = !field_error_messages.is_empty();

    let mut total_area = Decimal::ZERO;
    let mut weighted_supply = Decimal::ZERO;
    let mut weighted_degradation = Decimal::ZERO;

    for (field, result) in fields.iter().zip(&results) {
        if result.is_buffer_strip {
            continue;
        }
        let Some(balance) = result.balance() else {
            continue;
        };

        let area = field.field.area;
        total_area += area;
        weighted_supply += from_number(balance.supply.total) * area;
        weighted_degradation += from_number(balance.degradation.total) * area;
    }

    let (supply, degradation) = if total_area.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (weighted_supply / total_area, weighted_degradation / total_area)
    };

    OrganicMatterBalance {
        balance: supply + degradation,
        supply,
        degradation,
        fields: results,
        has_errors,
        field_error_messages,
    }
}

/// Farm-level projection
pub fn project_farm_balance(balance: OrganicMatterBalance) -> OrganicMatterBalanceNumeric {
    OrganicMatterBalanceNumeric {
        balance: to_number(balance.balance),
        supply: to_number(balance.supply),
        degradation: to_number(balance.degradation),
        fields: balance.fields,
        has_errors: balance.has_errors,
        field_error_messages: balance.field_error_messages,
    }
}

/// Projected field values are whole numbers, so this is exact
fn from_number(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{OrganicMatterDegradationNumeric, OrganicMatterSupplyNumeric};
    use crate::types::Field;
    use rust_decimal_macros::dec;

    fn input(id: &str, area: Decimal, is_buffer_strip: bool) -> FieldInput {
        FieldInput {
            field: Field {
                id: id.to_string(),
                area,
                is_buffer_strip,
            },
            cultivations: vec![],
            fertilizer_applications: vec![],
            soil_analyses: vec![],
        }
    }

    fn ok_result(
        field: &FieldInput,
        supply: f64,
        degradation: f64,
    ) -> OrganicMatterBalanceFieldResultNumeric {
        OrganicMatterBalanceFieldResultNumeric {
            id: field.field.id.clone(),
            area: to_number_exact(field.field.area),
            is_buffer_strip: field.field.is_buffer_strip,
            outcome: FieldOutcome::Balance(OrganicMatterBalanceFieldNumeric {
                id: field.field.id.clone(),
                balance: supply + degradation,
                supply: OrganicMatterSupplyNumeric {
                    total: supply,
                    ..Default::default()
                },
                degradation: OrganicMatterDegradationNumeric { total: degradation },
            }),
        }
    }

    fn error_result(field: &FieldInput, message: &str) -> OrganicMatterBalanceFieldResultNumeric {
        OrganicMatterBalanceFieldResultNumeric {
            id: field.field.id.clone(),
            area: to_number_exact(field.field.area),
            is_buffer_strip: field.field.is_buffer_strip,
            outcome: FieldOutcome::Error {
                message: message.to_string(),
            },
        }
    }

    #[test]
    fn test_area_weighted_average() {
        let fields = vec![input("a", dec!(10), false), input("b", dec!(5), false)];
        let results = vec![
            ok_result(&fields[0], 500.0, -200.0),
            ok_result(&fields[1], 400.0, -300.0),
        ];

        let balance = aggregate_fields(&fields, results);
        assert_eq!(balance.supply.round_dp(2), dec!(466.67));
        assert_eq!(balance.degradation.round_dp(2), dec!(-233.33));
        assert_eq!(balance.balance.round_dp(2), dec!(233.33));
        assert!(!balance.has_errors);

        let numeric = project_farm_balance(balance);
        assert_eq!(numeric.supply, 467.0);
        assert_eq!(numeric.degradation, -233.0);
        assert_eq!(numeric.balance, 233.0);
    }

    #[test]
    fn test_excludes_errors_and_buffer_strips() {
        let fields = vec![
            input("healthy", dec!(2), false),
            input("broken", dec!(50), false),
            input("strip", dec!(0.3), true),
        ];
        let results = vec![
            ok_result(&fields[0], 1000.0, -400.0),
            error_result(&fields[1], "Missing required soil parameters: a_som_loi"),
            ok_result(&fields[2], 0.0, 0.0),
        ];

        let balance = aggregate_fields(&fields, results);
        assert_eq!(balance.supply, dec!(1000));
        assert_eq!(balance.degradation, dec!(-400));
        assert_eq!(balance.balance, dec!(600));
        assert!(balance.has_errors);
        assert_eq!(balance.field_error_messages.len(), 1);
        // Every field stays visible
        assert_eq!(balance.fields.len(), 3);
    }

    #[test]
    fn test_zero_area_yields_zero() {
        let fields = vec![input("a", dec!(0), false)];
        let results = vec![ok_result(&fields[0], 800.0, -100.0)];

        let balance = aggregate_fields(&fields, results);
        assert_eq!(balance.supply, Decimal::ZERO);
        assert_eq!(balance.degradation, Decimal::ZERO);
        assert_eq!(balance.balance, Decimal::ZERO);
    }

    #[test]
    fn test_empty_farm() {
        let balance = aggregate_fields(&[], vec![]);
        let numeric = project_farm_balance(balance);
        assert_eq!(numeric.balance, 0.0);
        assert!(numeric.fields.is_empty());
        assert!(!numeric.has_errors);
    }
}
