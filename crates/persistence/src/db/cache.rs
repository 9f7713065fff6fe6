//! Time-bounded memoization of query results.
//!
//! Entries are keyed by [`cache_key`] and evicted only by their time to live.
//! Concurrent loads of the same key are coalesced: one caller runs the query,
//! the others wait for and share its result.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::StorageResult;
use crate::query::value::Params;

use super::row::Row;

/// Shared rows of one cached result set.
pub type CachedRows = Arc<Vec<Row>>;

/// Result cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of an entry from the moment it was loaded.
    pub ttl: Duration,
    /// When false every lookup goes straight to the loader.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(900),
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// An enabled cache with the given lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, enabled: true }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Hit and miss counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that ran the loader.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups served from the cache; 0 before the first lookup.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Derives the cache key of a statement template and its parameters.
///
/// The key is the SHA-256 of the template followed by the parameters as a
/// JSON object sorted by name, with timestamps truncated to whole seconds.
pub fn cache_key(template: &str, params: &Params) -> String {
    let args: Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.clone(), value.to_cache_json()))
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(template.as_bytes());
    hasher.update(Value::Object(args).to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Process-wide result cache, shared by every request.
pub struct ResultCache {
    config: CacheConfig,
    cache: Cache<String, CachedRows>,
    stats: CacheStats,
}

impl ResultCache {
    /// Creates an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        info!(
            enabled = config.enabled,
            ttl_secs = config.ttl.as_secs(),
            "Initializing result cache"
        );
        let cache = Cache::builder().time_to_live(config.ttl).build();
        Self {
            config,
            cache,
            stats: CacheStats::default(),
        }
    }

    /// The cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Hit and miss counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Returns the cached rows for `key`, running `load` on a miss.
    ///
    /// Failed loads are not cached; every waiter receives a clone of the error.
    pub async fn get_or_load<F, Fut>(&self, key: String, load: F) -> StorageResult<CachedRows>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StorageResult<Vec<Row>>>,
    {
        if !self.config.enabled {
            return load().await.map(Arc::new);
        }

        let entry = self
            .cache
            .entry(key)
            .or_try_insert_with(async move { load().await.map(Arc::new) })
            .await
            .map_err(|e| (*e).clone())?;

        let hit = !entry.is_fresh();
        self.stats.record(hit);
        debug!(
            key = %entry.key(),
            hit,
            hit_ratio = self.stats.hit_ratio(),
            "Result cache lookup"
        );
        Ok(entry.into_value())
    }

    /// Number of live entries.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
        info!(
            hits = self.stats.hits(),
            misses = self.stats.misses(),
            "Result cache cleared"
        );
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("config", &self.config)
            .field("entries", &self.cache.entry_count())
            .field("stats", &self.stats)
            .finish()
    }
}
