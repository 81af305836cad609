//! Redis-backed response cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Namespace prefix applied to every key, so the cache can share a Redis
/// database with other services.
const KEY_PREFIX: &str = "shortly:";

/// Response cache backed by Redis.
///
/// Holds a [`ConnectionManager`], which multiplexes and reconnects under the
/// hood. Gets and sets fail open: a Redis error degrades the request to a
/// repository lookup instead of failing it. Invalidation errors are the one
/// exception and propagate, because the caller decides what a missed
/// invalidation means.
pub struct RedisCache {
    manager: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Establishes the Redis connection and verifies it with a PING.
    ///
    /// `default_ttl_seconds` applies when [`CacheService::set`] is called
    /// without an explicit TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] when the URL does not parse,
    /// the connection cannot be established, or the PING goes unanswered.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::ConnectionError(format!("Invalid Redis URL: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis connection failed: {e}")))?;

        manager
            .clone()
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self {
            manager,
            default_ttl: default_ttl_seconds,
        })
    }

    // ConnectionManager clones share one underlying multiplexed connection.
    fn conn(&self) -> ConnectionManager {
        self.manager.clone()
    }

    fn namespaced(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self.conn().get(Self::namespaced(key)).await {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("Redis GET failed for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> CacheResult<()> {
        let ttl_seconds = ttl.unwrap_or(self.default_ttl);

        match self
            .conn()
            .set_ex::<_, _, ()>(Self::namespaced(key), value, ttl_seconds)
            .await
        {
            Ok(()) => debug!("Cache SET: {} (TTL: {}s)", key, ttl_seconds),
            Err(e) => warn!("Redis SET failed for {}: {}", key, e),
        }

        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        match self.conn().del::<_, i32>(Self::namespaced(key)).await {
            Ok(removed) => {
                if removed > 0 {
                    debug!("Cache INVALIDATE: {}", key);
                }
                Ok(())
            }
            Err(e) => Err(CacheError::OperationError(format!(
                "Redis DEL failed for {key}: {e}"
            ))),
        }
    }

    async fn health_check(&self) -> bool {
        self.conn().ping::<()>().await.is_ok()
    }
}
