//! Cache implementation that caches nothing.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use tracing::debug;

/// A [`CacheService`] with no storage: every get is a miss, every set and
/// invalidate is a successful no-op. With this backend all reads go straight
/// to the repository, which is what tests asserting exact access counts want,
/// and what a deployment gets when it turns response caching off.
#[derive(Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
