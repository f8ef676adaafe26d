//! Soil Analysis Combiner
//!
//! Reduces all soil samples of a field to a single record holding, per
//! parameter, the most recent measured value. Gaps can optionally be filled
//! with the conversion formulas before the result is projected to the
//! parameters the caller asked for.

use crate::error::BalanceError;
use crate::soil::conversion::{
    calculate_bulk_density, calculate_carbon_nitrogen_ratio, calculate_organic_carbon,
    calculate_organic_matter,
};
use crate::types::{SoilAnalysis, SoilType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// Soil parameters the combiner can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilParameter {
    OrganicCarbon,
    OrganicMatterLoi,
    CarbonNitrogenRatio,
    TotalNitrogen,
    BulkDensity,
    SoilType,
}

impl SoilParameter {
    /// Every parameter the combiner resolves before projection, in resolution order
    pub const ALL: [SoilParameter; 6] = [
        SoilParameter::OrganicCarbon,
        SoilParameter::OrganicMatterLoi,
        SoilParameter::CarbonNitrogenRatio,
        SoilParameter::TotalNitrogen,
        SoilParameter::BulkDensity,
        SoilParameter::SoilType,
    ];

    /// Laboratory parameter code
    pub fn code(&self) -> &'static str {
        match self {
            SoilParameter::OrganicCarbon => "a_c_of",
            SoilParameter::OrganicMatterLoi => "a_som_loi",
            SoilParameter::CarbonNitrogenRatio => "a_cn_fr",
            SoilParameter::TotalNitrogen => "a_n_rt",
            SoilParameter::BulkDensity => "a_density_sa",
            SoilParameter::SoilType => "b_soiltype_agr",
        }
    }
}

impl fmt::Display for SoilParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One representative soil record for a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedSoilAnalysis {
    pub organic_carbon: Option<Decimal>,
    pub organic_matter_loi: Option<Decimal>,
    pub carbon_nitrogen_ratio: Option<Decimal>,
    pub total_nitrogen: Option<Decimal>,
    pub bulk_density: Option<Decimal>,
    pub soil_type: Option<SoilType>,
}

impl CombinedSoilAnalysis {
    pub fn is_present(&self, parameter: SoilParameter) -> bool {
        match parameter {
            SoilParameter::OrganicCarbon => self.organic_carbon.is_some(),
            SoilParameter::OrganicMatterLoi => self.organic_matter_loi.is_some(),
            SoilParameter::CarbonNitrogenRatio => self.carbon_nitrogen_ratio.is_some(),
            SoilParameter::TotalNitrogen => self.total_nitrogen.is_some(),
            SoilParameter::BulkDensity => self.bulk_density.is_some(),
            SoilParameter::SoilType => self.soil_type.is_some(),
        }
    }

    fn clear(&mut self, parameter: SoilParameter) {
        match parameter {
            SoilParameter::OrganicCarbon => self.organic_carbon = None,
            SoilParameter::OrganicMatterLoi => self.organic_matter_loi = None,
            SoilParameter::CarbonNitrogenRatio => self.carbon_nitrogen_ratio = None,
            SoilParameter::TotalNitrogen => self.total_nitrogen = None,
            SoilParameter::BulkDensity => self.bulk_density = None,
            SoilParameter::SoilType => self.soil_type = None,
        }
    }

    /// Fill gaps from other parameters, each estimate only where its target is still empty
    fn estimate_missing(&mut self) {
        if self.organic_carbon.is_none() {
            self.organic_carbon = calculate_organic_carbon(self.organic_matter_loi);
        }
        if self.organic_matter_loi.is_none() {
            self.organic_matter_loi = calculate_organic_matter(self.organic_carbon);
        }
        if self.carbon_nitrogen_ratio.is_none() {
            self.carbon_nitrogen_ratio =
                calculate_carbon_nitrogen_ratio(self.organic_carbon, self.total_nitrogen);
        }
        if self.bulk_density.is_none() {
            self.bulk_density = calculate_bulk_density(self.organic_matter_loi, self.soil_type);
        }
    }
}

/// Combine the soil analyses of one field
///
/// Samples are ordered newest first; undated samples keep their position.
/// For each parameter the first sample with a value wins (zero counts as a
/// value). Fails when a requested parameter cannot be resolved, naming every
/// missing one.
pub fn combine_soil_analyses(
    analyses: &[SoilAnalysis],
    parameters: &[SoilParameter],
    estimate_missing: bool,
) -> Result<CombinedSoilAnalysis, BalanceError> {
    let ordered = order_newest_first(analyses);

    let mut combined = CombinedSoilAnalysis {
        organic_carbon: ordered.iter().find_map(|a| a.organic_carbon),
        organic_matter_loi: ordered.iter().find_map(|a| a.organic_matter_loi),
        carbon_nitrogen_ratio: ordered.iter().find_map(|a| a.carbon_nitrogen_ratio),
        total_nitrogen: ordered.iter().find_map(|a| a.total_nitrogen),
        bulk_density: ordered.iter().find_map(|a| a.bulk_density),
        soil_type: ordered.iter().find_map(|a| a.soil_type),
    };

    if estimate_missing {
        combined.estimate_missing();
    }

    for parameter in SoilParameter::ALL {
        if !parameters.contains(&parameter) {
            combined.clear(parameter);
        }
    }

    let missing: Vec<SoilParameter> = parameters
        .iter()
        .copied()
        .filter(|p| !combined.is_present(*p))
        .collect();

    if !missing.is_empty() {
        return Err(BalanceError::MissingSoilParameters { parameters: missing });
    }

    Ok(combined)
}

/// Sort dated samples newest first within the slots they occupy; undated
/// samples stay where they are.
fn order_newest_first(analyses: &[SoilAnalysis]) -> Vec<&SoilAnalysis> {
    let mut ordered: Vec<&SoilAnalysis> = analyses.iter().collect();

    let slots: Vec<usize> = ordered
        .iter()
        .enumerate()
        .filter(|(_, a)| a.sampling_date.is_some())
        .map(|(i, _)| i)
        .collect();

    let mut dated: Vec<&SoilAnalysis> = slots.iter().map(|&i| ordered[i]).collect();
    dated.sort_by_key(|a| Reverse(a.sampling_date));

    for (slot, analysis) in slots.into_iter().zip(dated) {
        ordered[slot] = analysis;
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    const BALANCE_PARAMETERS: [SoilParameter; 3] = [
        SoilParameter::OrganicMatterLoi,
        SoilParameter::BulkDensity,
        SoilParameter::SoilType,
    ];

    #[test]
    fn test_most_recent_value_wins() {
        let analyses = vec![
            SoilAnalysis {
                sampling_date: date(2020, 3, 1),
                organic_matter_loi: Some(dec!(2.0)),
                bulk_density: Some(dec!(1.4)),
                soil_type: Some(SoilType::Dekzand),
                ..Default::default()
            },
            SoilAnalysis {
                sampling_date: date(2023, 3, 1),
                organic_matter_loi: Some(dec!(3.5)),
                ..Default::default()
            },
        ];

        let combined = combine_soil_analyses(&analyses, &BALANCE_PARAMETERS, false).unwrap();
        assert_eq!(combined.organic_matter_loi, Some(dec!(3.5)));
        // Older sample fills what the newer one lacks
        assert_eq!(combined.bulk_density, Some(dec!(1.4)));
        assert_eq!(combined.soil_type, Some(SoilType::Dekzand));
        // Not requested, so projected away
        assert_eq!(combined.organic_carbon, None);
    }

    #[test]
    fn test_zero_is_a_value() {
        let analyses = vec![
            SoilAnalysis {
                sampling_date: date(2024, 1, 1),
                organic_matter_loi: Some(Decimal::ZERO),
                bulk_density: Some(dec!(1.2)),
                soil_type: Some(SoilType::Zeeklei),
                ..Default::default()
            },
            SoilAnalysis {
                sampling_date: date(2019, 1, 1),
                organic_matter_loi: Some(dec!(4.0)),
                ..Default::default()
            },
        ];

        let combined = combine_soil_analyses(&analyses, &BALANCE_PARAMETERS, true).unwrap();
        assert_eq!(combined.organic_matter_loi, Some(Decimal::ZERO));
    }

    #[test]
    fn test_undated_samples_keep_position() {
        let analyses = vec![
            SoilAnalysis {
                sampling_date: None,
                organic_matter_loi: Some(dec!(9.9)),
                ..Default::default()
            },
            SoilAnalysis {
                sampling_date: date(2018, 5, 1),
                organic_matter_loi: Some(dec!(1.0)),
                ..Default::default()
            },
            SoilAnalysis {
                sampling_date: date(2022, 5, 1),
                organic_matter_loi: Some(dec!(2.0)),
                ..Default::default()
            },
        ];

        let ordered = order_newest_first(&analyses);
        assert_eq!(ordered[0].organic_matter_loi, Some(dec!(9.9)));
        assert_eq!(ordered[1].sampling_date, date(2022, 5, 1));
        assert_eq!(ordered[2].sampling_date, date(2018, 5, 1));
    }

    #[test]
    fn test_estimates_bulk_density_from_carbon() {
        let analyses = vec![SoilAnalysis {
            sampling_date: date(2024, 2, 1),
            organic_carbon: Some(dec!(50)),
            soil_type: Some(SoilType::Dekzand),
            ..Default::default()
        }];

        let combined = combine_soil_analyses(&analyses, &BALANCE_PARAMETERS, true).unwrap();
        // 50 g C/kg -> 10 % LOI -> sandy density
        assert_eq!(combined.organic_matter_loi, Some(dec!(10)));
        assert_eq!(combined.bulk_density.unwrap().round_dp(3), dec!(1.103));
    }

    #[test]
    fn test_estimates_carbon_nitrogen_ratio() {
        let analyses = vec![SoilAnalysis {
            organic_matter_loi: Some(dec!(4)),
            total_nitrogen: Some(dec!(2000)),
            ..Default::default()
        }];

        let combined = combine_soil_analyses(
            &analyses,
            &[SoilParameter::OrganicCarbon, SoilParameter::CarbonNitrogenRatio],
            true,
        )
        .unwrap();
        assert_eq!(combined.organic_carbon, Some(dec!(20)));
        assert_eq!(combined.carbon_nitrogen_ratio, Some(dec!(10)));
    }

    #[test]
    fn test_measured_values_are_not_overwritten() {
        let analyses = vec![SoilAnalysis {
            organic_matter_loi: Some(dec!(10)),
            bulk_density: Some(dec!(1.5)),
            soil_type: Some(SoilType::Dekzand),
            ..Default::default()
        }];

        let combined = combine_soil_analyses(&analyses, &BALANCE_PARAMETERS, true).unwrap();
        assert_eq!(combined.bulk_density, Some(dec!(1.5)));
    }

    #[test]
    fn test_reports_every_missing_parameter() {
        let analyses = vec![SoilAnalysis {
            total_nitrogen: Some(dec!(1200)),
            ..Default::default()
        }];

        let err = combine_soil_analyses(&analyses, &BALANCE_PARAMETERS, true).unwrap_err();
        assert_eq!(
            err,
            BalanceError::MissingSoilParameters {
                parameters: BALANCE_PARAMETERS.to_vec(),
            }
        );
    }

    #[test]
    fn test_no_estimation_leaves_gaps() {
        let analyses = vec![SoilAnalysis {
            organic_matter_loi: Some(dec!(3)),
            soil_type: Some(SoilType::Veen),
            ..Default::default()
        }];

        let err = combine_soil_analyses(&analyses, &BALANCE_PARAMETERS, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required soil parameters: a_density_sa"
        );
    }
}
