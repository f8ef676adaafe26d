//! Soil Organic Matter Degradation
//!
//! Annual SOM turnover from organic matter content, bulk density and land
//! use, corrected for the regional mean temperature and scaled to the
//! length of the time frame. Results follow the loss sign convention:
//! degradation is zero or negative.

use crate::catalog::Catalog;
use crate::soil::CombinedSoilAnalysis;
use crate::types::{CropRotation, Cultivation, TimeFrame};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Regional average annual temperature, °C
const AVERAGE_TEMPERATURE: Decimal = dec!(9.3);

/// Reference temperature of the degradation rate, °C
const REFERENCE_TEMPERATURE: Decimal = dec!(13);

/// Active topsoil depth, cm
const DEPTH_GRASSLAND: Decimal = dec!(10);
const DEPTH_ARABLE: Decimal = dec!(30);

/// Rate coefficients: rate = ln(LOI) × SLOPE + INTERCEPT
const RATE_SLOPE: Decimal = dec!(-0.008934);
const RATE_INTERCEPT: Decimal = dec!(0.038228);

/// Maximum annual degradation, kg OM/ha/yr
const MAX_ANNUAL_DEGRADATION: Decimal = dec!(3500);

const DAYS_PER_YEAR: Decimal = dec!(365);

/// SOM degradation over the time frame, kg OM/ha (≤ 0)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganicMatterDegradation {
    pub total: Decimal,
}

/// Land use as far as degradation depth is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandUse {
    Grassland,
    Arable,
}

impl LandUse {
    /// Grassland as soon as one cultivation is a grass crop
    pub fn classify(cultivations: &[Cultivation], catalog: &Catalog) -> Self {
        let has_grass = cultivations.iter().any(|c| {
            catalog
                .cultivation(&c.catalogue_id)
                .and_then(|detail| detail.crop_rotation)
                == Some(CropRotation::Grass)
        });

        if has_grass {
            LandUse::Grassland
        } else {
            LandUse::Arable
        }
    }

    pub fn depth(&self) -> Decimal {
        match self {
            LandUse::Grassland => DEPTH_GRASSLAND,
            LandUse::Arable => DEPTH_ARABLE,
        }
    }
}

/// Q10-style correction: 2^((T - 13) / 10)
fn temperature_correction() -> Decimal {
    Decimal::TWO.powd((AVERAGE_TEMPERATURE - REFERENCE_TEMPERATURE) / dec!(10))
}

/// Calculate SOM degradation of a field over the time frame
///
/// Missing organic matter or bulk density means degradation is unknown and
/// resolves to zero, as does a non-positive organic matter content. A time
/// frame that ends before it starts covers no days and also yields zero.
pub fn calculate_organic_matter_degradation(
    soil: &CombinedSoilAnalysis,
    cultivations: &[Cultivation],
    catalog: &Catalog,
    time_frame: &TimeFrame,
) -> OrganicMatterDegradation {
    let (Some(loi), Some(bulk_density)) = (soil.organic_matter_loi, soil.bulk_density) else {
        return OrganicMatterDegradation::default();
    };

    let depth = LandUse::classify(cultivations, catalog).depth();
    let correction = temperature_correction();

    if loi <= Decimal::ZERO {
        return OrganicMatterDegradation::default();
    }

    let rate = loi.ln() * RATE_SLOPE + RATE_INTERCEPT;
    let annual = loi * depth * (bulk_density * dec!(1000)) * rate * correction;
    let annual = annual.clamp(Decimal::ZERO, MAX_ANNUAL_DEGRADATION);

    if annual.is_zero() {
        return OrganicMatterDegradation::default();
    }

    let days = time_frame.inclusive_days();
    if days <= 0 {
        return OrganicMatterDegradation::default();
    }
    let years = Decimal::from(days) / DAYS_PER_YEAR;

    OrganicMatterDegradation {
        total: -(annual * years),
    }
}
