//! Cache service trait, error types, and the read-through helper.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

/// Failure modes of a cache backend.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "cache connection failed: {e}"),
            Self::OperationError(e) => write!(f, "cache operation failed: {e}"),
        }
    }
}

impl std::error::Error for CacheError {}

pub type CacheResult<T> = Result<T, CacheError>;

/// Store for serialized read responses.
///
/// Keys name the full logical request (`resolve:{code}`, `stats:{code}`) and
/// values are opaque serialized payloads; the cache never interprets them.
/// Entries expire after the TTL given to [`CacheService::set`], and an
/// expired entry is indistinguishable from an absent one.
///
/// Backends are [`RedisCache`], [`MemoryCache`], and [`NullCache`]. All of
/// them fail open on reads and writes, so a broken cache costs throughput,
/// never correctness.
///
/// [`RedisCache`]: crate::infrastructure::cache::RedisCache
/// [`MemoryCache`]: crate::infrastructure::cache::MemoryCache
/// [`NullCache`]: crate::infrastructure::cache::NullCache
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached payload, or `Ok(None)` for a miss, an expired
    /// entry, or a backend error (fail open).
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a payload. `ttl_seconds = None` falls back to the backend's
    /// default TTL. Backend errors are logged, not propagated.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Drops a cached payload. Unlike reads and writes this propagates
    /// failure, because the caller of a write path has to know whether a
    /// stale entry may still be served.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Whether the backend currently answers.
    async fn health_check(&self) -> bool;
}

/// Read-through lookup: cache get, loader call on miss, cache put.
///
/// A corrupt cached payload is dropped and treated as a miss. Loader errors
/// propagate untouched; cache errors degrade to the loader.
pub async fn lookup_with_cache<T, F, Fut>(
    cache: &dyn CacheService,
    key: &str,
    ttl_seconds: u64,
    loader: F,
) -> Result<T, AppError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!(key, "Cache HIT");
                metrics::counter!("cache_hits_total").increment(1);
                return Ok(value);
            }
            Err(e) => {
                warn!(key, error = %e, "Dropping undecodable cache entry");
                let _ = cache.invalidate(key).await;
            }
        },
        Ok(None) => debug!(key, "Cache MISS"),
        Err(e) => warn!(key, error = %e, "Cache read failed, falling back to loader"),
    }

    metrics::counter!("cache_misses_total").increment(1);
    let value = loader().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(e) = cache.set(key, &raw, Some(ttl_seconds)).await {
                warn!(key, error = %e, "Failed to populate cache");
            }
        }
        Err(e) => warn!(key, error = %e, "Failed to serialize cache payload"),
    }

    Ok(value)
}
