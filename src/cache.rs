//! Calculation Cache
//!
//! The field calculator is wrapped by a memoizing cache keyed on the
//! calculator version and a digest of the explicit inputs. Implementations:
//! - `NoCache`: always computes
//! - `MokaCache`: in-memory, bounded, with TTL; concurrent lookups of the
//!   same missing key share a single computation
//!
//! Failed computations are never cached.

use crate::catalog::Catalog;
use crate::config::CacheConfig;
use crate::error::BalanceError;
use crate::types::{FieldInput, TimeFrame};
use futures::future::BoxFuture;
use moka::future::Cache as MokaStore;
use sha2::{Digest, Sha256};
use std::hash::Hash;
use std::time::Duration;

/// Name of the cached function, part of every field cache key
pub const FIELD_FUNCTION_NAME: &str = "calculate_organic_matter_balance_field";

/// Memoizing wrapper around an async computation
pub trait Cache<K, V>: Send + Sync {
    /// Return the cached value for `key`, or run `compute` and store its success
    fn get_or_compute<'a>(
        &'a self,
        key: K,
        compute: BoxFuture<'a, Result<V, BalanceError>>,
    ) -> BoxFuture<'a, Result<V, BalanceError>>;
}

/// Cache that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<K, V> Cache<K, V> for NoCache
where
    K: Send + 'static,
    V: Send + 'static,
{
    fn get_or_compute<'a>(
        &'a self,
        _key: K,
        compute: BoxFuture<'a, Result<V, BalanceError>>,
    ) -> BoxFuture<'a, Result<V, BalanceError>> {
        compute
    }
}

/// In-memory cache backed by moka
#[derive(Clone)]
pub struct MokaCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: MokaStore<K, V>,
}

impl<K, V> MokaCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: &CacheConfig) -> Self {
        let inner = MokaStore::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_secs))
            .build();
        Self { inner }
    }

    /// Cached value without computing
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }

    /// Number of cached entries (after pending maintenance has run)
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl<K, V> Cache<K, V> for MokaCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get_or_compute<'a>(
        &'a self,
        key: K,
        compute: BoxFuture<'a, Result<V, BalanceError>>,
    ) -> BoxFuture<'a, Result<V, BalanceError>> {
        Box::pin(async move {
            self.inner
                .try_get_with(key, compute)
                .await
                .map_err(|err| (*err).clone())
        })
    }
}

/// Cache key of one field calculation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCacheKey {
    pub function_name: &'static str,
    pub calculator_version: String,
    /// Hex SHA-256 over catalog, field input and time frame
    pub digest: String,
}

impl FieldCacheKey {
    pub fn new(
        calculator_version: &str,
        catalog: &Catalog,
        field: &FieldInput,
        time_frame: &TimeFrame,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(FIELD_FUNCTION_NAME.as_bytes());
        hasher.update(calculator_version.as_bytes());
        hasher.update(catalog.digest().as_bytes());
        // Serializing plain data structs cannot fail
        if let Ok(bytes) = serde_json::to_vec(&(field, time_frame)) {
            hasher.update(&bytes);
        }

        Self {
            function_name: FIELD_FUNCTION_NAME,
            calculator_version: calculator_version.to_string(),
            digest: hex::encode(hasher.finalize()),
        }
    }
}
