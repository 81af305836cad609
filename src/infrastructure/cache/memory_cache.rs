//! In-process cache implementation.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Thread-safe in-process cache with per-entry TTL.
///
/// Backed by a DashMap so reads are concurrent and lock-free for most cases.
/// Expired entries are purged lazily when read. Used when Redis is not
/// configured, and as the cache backend in tests.
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates a new in-process cache with the given default TTL.
    pub fn new(default_ttl_seconds: u64) -> Self {
        debug!("Using MemoryCache (default TTL: {}s)", default_ttl_seconds);
        Self {
            entries: DashMap::new(),
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };

        if entry.is_expired() {
            drop(entry);
            self.entries.remove(key);
            return Ok(None);
        }

        Ok(Some(entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> CacheResult<()> {
        let ttl = ttl.map_or(self.default_ttl, Duration::from_secs);
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };

        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
