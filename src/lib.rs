//! Organic Matter Balance Calculator
//!
//! Computes how much effective organic matter is added to a farm's soils per
//! year versus how much degrades, per field and as an area-weighted farm
//! summary. All arithmetic uses exact decimals; results are projected to
//! whole numbers at the boundary.
//!
//! Layout:
//! - `soil/`: Soil analysis combination and conversion formulas
//! - `supply/`: EOM supply from fertilizers, cultivations and crop residues
//! - `degradation`: SOM degradation model
//! - `field`: Single-field balance (pure, cacheable)
//! - `farm`: Batched farm-level aggregation with per-field failure isolation
//! - `projection`: Decimal to plain-number result types
//! - `cache`, `catalog`, `config`, `error`, `types`: Supporting pieces

pub mod types;
pub mod error;
pub mod config;
pub mod catalog;
pub mod soil;
pub mod supply;
pub mod degradation;
pub mod field;
pub mod cache;
pub mod projection;
pub mod farm;

// Re-export commonly used types
pub use types::{
    CropRotation, Cultivation, CultivationDetail, FertilizerApplication, FertilizerDetail,
    FertilizerType, Field, FieldInput, OrganicMatterBalanceInput, SoilAnalysis, SoilType,
    TimeFrame,
};
pub use error::BalanceError;
pub use config::{BalanceConfig, CacheConfig, CALCULATOR_VERSION};
pub use catalog::Catalog;
pub use soil::{
    calculate_bulk_density, calculate_carbon_nitrogen_ratio, calculate_organic_carbon,
    calculate_organic_matter, combine_soil_analyses, CombinedSoilAnalysis, SoilParameter,
};
pub use supply::{calculate_organic_matter_supply, OrganicMatterSupply};
pub use degradation::{calculate_organic_matter_degradation, OrganicMatterDegradation};
pub use field::{
    calculate_field_balance, calculate_organic_matter_balance_field,
    calculate_organic_matter_balance_field_cached, OrganicMatterBalanceField,
};
pub use cache::{Cache, FieldCacheKey, MokaCache, NoCache};
pub use projection::{
    FieldOutcome, OrganicMatterBalanceFieldNumeric, OrganicMatterBalanceFieldResultNumeric,
    OrganicMatterBalanceNumeric,
};
pub use farm::{
    calculate_organic_matter_balance, calculate_organic_matter_balance_uncached,
    OrganicMatterBalance,
};
