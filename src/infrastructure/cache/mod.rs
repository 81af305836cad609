//! Caching layer for read responses.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - production Redis-backed cache
//! - [`MemoryCache`] - in-process cache with TTL support
//! - [`NullCache`] - no-op implementation for disabled caching
//!
//! Cached values are derived, disposable snapshots of read responses; the
//! repository stays the source of truth.

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService, lookup_with_cache};
