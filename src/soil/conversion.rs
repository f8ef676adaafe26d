//! Conversion Formulas
//!
//! Pedotransfer functions used to estimate soil parameters that were not
//! measured. Every result is clamped to a physically plausible range and
//! every function passes `None` through when an input is missing.

use crate::types::SoilType;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Organic carbon range, g C/kg
const ORGANIC_CARBON_MIN: Decimal = dec!(0.1);
const ORGANIC_CARBON_MAX: Decimal = dec!(600);

/// Organic matter (LOI) range, %
const ORGANIC_MATTER_MIN: Decimal = dec!(0.5);
const ORGANIC_MATTER_MAX: Decimal = dec!(75);

/// Carbon/nitrogen ratio range
const CN_RATIO_MIN: Decimal = dec!(5);
const CN_RATIO_MAX: Decimal = dec!(40);

/// Bulk density range, g/cm³
const BULK_DENSITY_MIN: Decimal = dec!(0.5);
const BULK_DENSITY_MAX: Decimal = dec!(3);

/// Carbon fraction of organic matter
const CARBON_FRACTION: Decimal = dec!(0.5);

/// Organic carbon (g C/kg) from organic matter by loss on ignition (%)
///
/// carbon = LOI × 0.5 × 10
pub fn calculate_organic_carbon(organic_matter_loi: Option<Decimal>) -> Option<Decimal> {
    let loi = organic_matter_loi?;
    let carbon = loi * CARBON_FRACTION * dec!(10);
    Some(carbon.clamp(ORGANIC_CARBON_MIN, ORGANIC_CARBON_MAX))
}

/// Organic matter by loss on ignition (%) from organic carbon (g C/kg)
pub fn calculate_organic_matter(organic_carbon: Option<Decimal>) -> Option<Decimal> {
    let carbon = organic_carbon?;
    let loi = carbon / dec!(10) / CARBON_FRACTION;
    Some(loi.clamp(ORGANIC_MATTER_MIN, ORGANIC_MATTER_MAX))
}

/// Carbon/nitrogen ratio from organic carbon (g C/kg) and total nitrogen (mg N/kg)
///
/// Zero nitrogen with positive carbon resolves to the upper bound; zero over
/// zero is undefined and yields `None`.
pub fn calculate_carbon_nitrogen_ratio(
    organic_carbon: Option<Decimal>,
    total_nitrogen: Option<Decimal>,
) -> Option<Decimal> {
    let carbon = organic_carbon?;
    let nitrogen = total_nitrogen?;

    match carbon.checked_div(nitrogen / dec!(1000)) {
        Some(ratio) => Some(ratio.clamp(CN_RATIO_MIN, CN_RATIO_MAX)),
        None if carbon > Decimal::ZERO => Some(CN_RATIO_MAX),
        None => None,
    }
}

/// Bulk density (g/cm³) from organic matter (%) and soil type
///
/// Sandy soils: 1 / (LOI × 0.02525 + 0.6541)
/// Other soils: 0.00000067·LOI⁴ − 0.00007792·LOI³ + 0.00314712·LOI²
///   − 0.06039523·LOI + 1.33932206
pub fn calculate_bulk_density(
    organic_matter_loi: Option<Decimal>,
    soil_type: Option<SoilType>,
) -> Option<Decimal> {
    let loi = organic_matter_loi?;
    let soil_type = soil_type?;

    let density = if soil_type.is_sandy() {
        Decimal::ONE.checked_div(loi * dec!(0.02525) + dec!(0.6541))?
    } else {
        let loi2 = loi * loi;
        let loi3 = loi2 * loi;
        let loi4 = loi3 * loi;
        dec!(0.00000067) * loi4 - dec!(0.00007792) * loi3 + dec!(0.00314712) * loi2
            - dec!(0.06039523) * loi
            + dec!(1.33932206)
    };

    Some(density.clamp(BULK_DENSITY_MIN, BULK_DENSITY_MAX))
}
