//! Input Data Model
//!
//! Already-authorized field data and catalog reference records, as handed
//! over by the persistence layer. The calculators only read these.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Agricultural soil type classes (`b_soiltype_agr`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    MoerigeKlei,
    Rivierklei,
    Dekzand,
    Zeeklei,
    Dalgrond,
    Veen,
    Loess,
    Duinzand,
    Maasklei,
}

impl SoilType {
    /// Mineral sandy soils, which use the reciprocal bulk density formula
    pub fn is_sandy(&self) -> bool {
        matches!(self, SoilType::Dekzand | SoilType::Dalgrond | SoilType::Duinzand)
    }
}

/// Fertilizer category of a catalog product (`p_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FertilizerType {
    Manure,
    Compost,
    Mineral,
}

/// Crop rotation class of a catalog crop (`b_lu_croprotation`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropRotation {
    Other,
    Clover,
    Nature,
    Potato,
    Grass,
    Rapeseed,
    Starch,
    Maize,
    Cereal,
    Sugarbeet,
    Alfalfa,
    Catchcrop,
}

/// Inclusive reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeFrame {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeFrame {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both ends inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, counting both ends
    pub fn inclusive_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Field identity and geometry summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field id (`b_id`)
    pub id: String,
    /// Area in hectares (`b_area`)
    pub area: Decimal,
    /// Buffer strips are reported but never fertilized or aggregated
    #[serde(default)]
    pub is_buffer_strip: bool,
}

/// A crop grown on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cultivation {
    /// Cultivation id (`b_lu`)
    pub id: String,
    /// Catalog reference (`b_lu_catalogue`)
    pub catalogue_id: String,
    pub sowing_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
    /// Crop residues left on the field (`m_cropresidue`)
    #[serde(default)]
    pub residue_retained: Option<bool>,
}

/// A single fertilizer application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerApplication {
    /// Application id (`p_app_id`)
    pub id: String,
    /// Catalog reference (`p_id_catalogue`)
    pub catalogue_id: String,
    /// Applied amount in kg product/ha
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

/// One soil sample; any measurement may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilAnalysis {
    pub sampling_date: Option<NaiveDate>,
    /// Organic carbon, g C/kg (`a_c_of`)
    #[serde(default)]
    pub organic_carbon: Option<Decimal>,
    /// Organic matter by loss on ignition, % (`a_som_loi`)
    #[serde(default)]
    pub organic_matter_loi: Option<Decimal>,
    /// Carbon/nitrogen ratio (`a_cn_fr`)
    #[serde(default)]
    pub carbon_nitrogen_ratio: Option<Decimal>,
    /// Total nitrogen, mg N/kg (`a_n_rt`)
    #[serde(default)]
    pub total_nitrogen: Option<Decimal>,
    /// Bulk density, g/cm³ (`a_density_sa`)
    #[serde(default)]
    pub bulk_density: Option<Decimal>,
    /// Agricultural soil type (`b_soiltype_agr`)
    #[serde(default)]
    pub soil_type: Option<SoilType>,
}

/// All raw data of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInput {
    pub field: Field,
    #[serde(default)]
    pub cultivations: Vec<Cultivation>,
    #[serde(default)]
    pub fertilizer_applications: Vec<FertilizerApplication>,
    #[serde(default)]
    pub soil_analyses: Vec<SoilAnalysis>,
}

/// Catalog record of a fertilizer product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerDetail {
    /// Catalog id (`p_id_catalogue`)
    pub id: String,
    /// Effective organic matter, g EOM/kg product (`p_eom`)
    pub eom: Option<Decimal>,
    pub fertilizer_type: Option<FertilizerType>,
}

/// Catalog record of a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivationDetail {
    /// Catalog id (`b_lu_catalogue`)
    pub id: String,
    /// Effective organic matter of the crop itself, kg EOM/ha/yr (`b_lu_eom`)
    pub eom: Option<Decimal>,
    /// Effective organic matter of its residues, kg EOM/ha/yr (`b_lu_eom_residues`)
    pub eom_residues: Option<Decimal>,
    pub crop_rotation: Option<CropRotation>,
}

/// Farm-level request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicMatterBalanceInput {
    pub fields: Vec<FieldInput>,
    #[serde(default)]
    pub fertilizer_details: Vec<FertilizerDetail>,
    #[serde(default)]
    pub cultivation_details: Vec<CultivationDetail>,
    pub time_frame: TimeFrame,
}
