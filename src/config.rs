//! Calculator Configuration
//!
//! Batch size, cache settings and the calculator version tag used to
//! namespace cached field results. Loaded from JSON; every field is optional
//! and falls back to its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Version tag of the calculation logic; bump to invalidate cached results
pub const CALCULATOR_VERSION: &str = concat!("om_balance@", env!("CARGO_PKG_VERSION"));

/// Fields evaluated concurrently per batch
pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub time_to_live_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,  // 10K field results
            time_to_live_secs: 300, // 5 min TTL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub batch_size: usize,
    pub calculator_version: String,
    pub cache: CacheConfig,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            calculator_version: CALCULATOR_VERSION.to_string(),
            cache: CacheConfig::default(),
        }
    }
}

impl BalanceConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read balance config file: {:?}", path))?;

        Self::from_json(&contents)
            .with_context(|| format!("Invalid balance config: {:?}", path))
    }

    /// Parse and validate configuration JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BalanceConfig =
            serde_json::from_str(json).with_context(|| "Failed to parse balance config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        if self.calculator_version.trim().is_empty() {
            anyhow::bail!("calculator_version must not be empty");
        }
        if self.cache.max_capacity == 0 {
            anyhow::bail!("cache.max_capacity must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BalanceConfig::default();
        assert_eq!(config.batch_size, 50);
        assert!(config.calculator_version.starts_with("om_balance@"));
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.cache.time_to_live_secs, 300);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{ "batch_size": 20, "cache": { "time_to_live_secs": 60 } }"#;
        let config = BalanceConfig::from_json(json).unwrap();
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.calculator_version, CALCULATOR_VERSION);
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.cache.time_to_live_secs, 60);
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let err = BalanceConfig::from_json(r#"{ "batch_size": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(BalanceConfig::from_json("{ batch_size: ").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let name = format!("om_balance_config_{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        {
            let mut file = fs::File::create(&path).unwrap();
            write!(file, r#"{{ "calculator_version": "2025-test" }}"#).unwrap();
        }

        let config = BalanceConfig::load(&path).unwrap();
        assert_eq!(config.calculator_version, "2025-test");
        assert_eq!(config.batch_size, 50);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = BalanceConfig::load(Path::new("/nonexistent/om_balance.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read balance config file"));
    }
}
