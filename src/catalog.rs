//! Catalog Lookups - In-memory typed storage for fertilizer and crop details
//!
//! Built once per farm-level call from the caller's detail lists and shared
//! read-only across all field calculations.

use crate::types::{CultivationDetail, FertilizerDetail};
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};

/// Fertilizer and crop details indexed by catalog id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    fertilizers: FxHashMap<String, FertilizerDetail>,
    cultivations: FxHashMap<String, CultivationDetail>,
    digest: String,
}

impl Catalog {
    /// Index the detail lists. Later entries win on duplicate ids.
    pub fn new(
        fertilizer_details: &[FertilizerDetail],
        cultivation_details: &[CultivationDetail],
    ) -> Self {
        let fertilizers = fertilizer_details
            .iter()
            .map(|d| (d.id.clone(), d.clone()))
            .collect();
        let cultivations = cultivation_details
            .iter()
            .map(|d| (d.id.clone(), d.clone()))
            .collect();

        Self {
            fertilizers,
            cultivations,
            digest: digest_details(fertilizer_details, cultivation_details),
        }
    }

    /// Get fertilizer detail for a catalog id
    pub fn fertilizer(&self, catalogue_id: &str) -> Option<&FertilizerDetail> {
        self.fertilizers.get(catalogue_id)
    }

    /// Get crop detail for a catalog id
    pub fn cultivation(&self, catalogue_id: &str) -> Option<&CultivationDetail> {
        self.cultivations.get(catalogue_id)
    }

    /// Hex SHA-256 over the detail lists as supplied, for cache keys
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn len(&self) -> usize {
        self.fertilizers.len() + self.cultivations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fertilizers.is_empty() && self.cultivations.is_empty()
    }
}

fn digest_details(
    fertilizer_details: &[FertilizerDetail],
    cultivation_details: &[CultivationDetail],
) -> String {
    let mut hasher = Sha256::new();
    // Serializing plain data structs cannot fail
    if let Ok(bytes) = serde_json::to_vec(&(fertilizer_details, cultivation_details)) {
        hasher.update(&bytes);
    }
    hex::encode(hasher.finalize())
}
