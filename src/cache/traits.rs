//! Cache service trait definition

use crate::error::CacheResult;
use std::time::Duration;

/// Trait defining backend cache operations
///
/// Implemented by the concrete backends (Redis, local store). Values are the
/// JSON text produced by the [`Cache`](super::Cache) facade; backends never
/// look inside them. Every operation reports failure through `CacheResult` and
/// leaves retry and fail-open policy to the facade.
pub trait CacheService: Send + Sync {
    /// Get a value from the cache by key
    ///
    /// Returns `Ok(Some(value))` on cache hit, `Ok(None)` on cache miss.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = CacheResult<Option<String>>> + Send;

    /// Set a value in the cache with a TTL
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = CacheResult<()>> + Send;

    /// Delete a specific key from the cache
    fn delete(&self, key: &str) -> impl std::future::Future<Output = CacheResult<()>> + Send;

    /// Delete keys under `prefix` matching the glob `pattern`
    ///
    /// Returns the number of keys removed.
    fn delete_pattern(
        &self,
        prefix: &str,
        pattern: &str,
    ) -> impl std::future::Future<Output = CacheResult<u64>> + Send;

    /// Remove every entry in every namespace
    fn clear(&self) -> impl std::future::Future<Output = CacheResult<()>> + Send;

    /// Check if the cache backend is healthy
    fn health_check(&self) -> impl std::future::Future<Output = CacheResult<bool>> + Send;

    /// Get the name of the cache provider
    fn provider_name(&self) -> &'static str;

    /// Whether state is shared with other processes
    fn is_distributed(&self) -> bool;
}
