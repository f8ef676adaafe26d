//! Crop residue supply
//!
//! Residues count when they were left on the field, the crop was terminated
//! inside the time frame (both ends inclusive) and the catalog gives a
//! nonzero residue EOM.

use super::SupplyContribution;
use crate::catalog::Catalog;
use crate::types::{Cultivation, TimeFrame};
use rust_decimal::Decimal;
use serde::Serialize;

/// EOM supplied by crop residues, kg EOM/ha
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResidueSupply {
    pub total: Decimal,
    pub cultivations: Vec<SupplyContribution>,
}

/// Calculate EOM supply from retained crop residues
pub fn calculate_residue_supply(
    cultivations: &[Cultivation],
    catalog: &Catalog,
    time_frame: &TimeFrame,
) -> ResidueSupply {
    let mut supply = ResidueSupply::default();

    for cultivation in cultivations {
        if cultivation.residue_retained != Some(true) {
            continue;
        }

        let terminated_in_frame = cultivation
            .termination_date
            .is_some_and(|date| time_frame.contains(date));
        if !terminated_in_frame {
            continue;
        }

        let eom = catalog
            .cultivation(&cultivation.catalogue_id)
            .and_then(|detail| detail.eom_residues)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CultivationDetail;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn year_2025() -> TimeFrame {
        TimeFrame::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
    }

    fn cultivation(
        id: &str,
        catalogue_id: &str,
        end: Option<NaiveDate>,
        retained: Option<bool>,
    ) -> Cultivation {
        Cultivation {
            id: id.to_string(),
            catalogue_id: catalogue_id.to_string(),
            sowing_date: NaiveDate::from_ymd_opt(2024, 10, 1),
            termination_date: end,
            residue_retained: retained,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            &[],
            &[
                CultivationDetail {
                    id: "wheat".to_string(),
                    eom: Some(dec!(860)),
                    eom_residues: Some(dec!(1200)),
                    crop_rotation: None,
                },
                CultivationDetail {
                    id: "potato".to_string(),
                    eom: Some(dec!(340)),
                    eom_residues: Some(Decimal::ZERO),
                    crop_rotation: None,
                },
            ],
        )
    }

    #[test]
    fn test_counts_only_qualifying_cultivations() {
        let cultivations = vec![
            // Counts: retained, terminated on the last day of the frame
            cultivation("c1", "wheat", NaiveDate::from_ymd_opt(2025, 12, 31), Some(true)),
            // Counts: terminated on the first day
            cultivation("c2", "wheat", NaiveDate::from_ymd_opt(2025, 1, 1), Some(true)),
            // Residues removed
            cultivation("c3", "wheat", NaiveDate::from_ymd_opt(2025, 8, 1), Some(false)),
            // Unknown residue handling
            cultivation("c4", "wheat", NaiveDate::from_ymd_opt(2025, 8, 1), None),
            // Terminated after the frame
            cultivation("c5", "wheat", NaiveDate::from_ymd_opt(2026, 1, 1), Some(true)),
            // Still standing
            cultivation("c6", "wheat", None, Some(true)),
            // Zero residue EOM
            cultivation("c7", "potato", NaiveDate::from_ymd_opt(2025, 9, 1), Some(true)),
            // Not in catalog
            cultivation("c8", "rye", NaiveDate::from_ymd_opt(2025, 9, 1), Some(true)),
        ];

        let supply = calculate_residue_supply(&cultivations, &catalog(), &year_2025());
        assert_eq!(supply.total, dec!(2400));
        let ids: Vec<&str> = supply.cultivations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }
}
