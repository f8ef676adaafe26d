//! Soil data preparation
//!
//! - `conversion`: Scalar pedotransfer formulas between soil parameters
//! - `combiner`: Merges dated soil samples into one representative record

pub mod conversion;
pub mod combiner;

pub use conversion::{
    calculate_bulk_density, calculate_carbon_nitrogen_ratio, calculate_organic_carbon,
    calculate_organic_matter,
};
pub use combiner::{combine_soil_analyses, CombinedSoilAnalysis, SoilParameter};
