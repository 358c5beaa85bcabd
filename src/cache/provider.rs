//! Backend selection and the fail-open cache facade
//!
//! [`CacheBackend`] uses enum dispatch over the production backends and is
//! chosen once, at bootstrap. [`Cache`] wraps any [`CacheService`] and is the
//! only type application code talks to. Every facade operation collapses
//! backend and serialization failures into a miss or a no-op after logging
//! them, so a cache outage costs latency, never correctness.

use super::health::CacheHealth;
use super::keys::{cache_key, Ttl};
use super::providers::LocalCacheService;
use super::stats::{CacheStats, CacheStatsSnapshot};
use super::traits::CacheService;
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[cfg(feature = "cache-redis")]
use super::providers::RedisCacheService;

/// Production cache backends
#[derive(Debug, Clone)]
pub enum CacheBackend {
    /// Redis cache provider (boxed to reduce enum size)
    #[cfg(feature = "cache-redis")]
    Redis(Box<RedisCacheService>),

    /// In-process map, used when Redis is disabled or unreachable
    Local(LocalCacheService),
}

impl CacheBackend {
    /// Select a backend from configuration with graceful degradation
    ///
    /// If Redis is enabled but cannot be reached, logs a warning and returns
    /// the local store instead. Never fails.
    pub async fn from_config(config: &CacheConfig) -> Self {
        if !config.redis.enabled {
            info!(backend = "local", "Networked cache disabled by configuration");
            return Self::local();
        }

        Self::create_redis_backend(config).await
    }

    pub fn local() -> Self {
        Self::Local(LocalCacheService::new())
    }

    /// Attempt to create a Redis backend, falling back to the local store on failure
    #[cfg(feature = "cache-redis")]
    async fn create_redis_backend(config: &CacheConfig) -> Self {
        match RedisCacheService::from_config(&config.redis).await {
            Ok(service) => {
                info!(backend = "redis", "Networked cache provider initialized successfully");
                Self::Redis(Box::new(service))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    url = %super::providers::redis::redact_url(&config.redis.url),
                    "Redis not available, using in-memory cache (degraded mode)"
                );
                Self::local()
            }
        }
    }

    /// Fallback when cache-redis feature is not enabled
    #[cfg(not(feature = "cache-redis"))]
    async fn create_redis_backend(_config: &CacheConfig) -> Self {
        warn!("Redis cache requested but 'cache-redis' feature not enabled, using in-memory cache");
        Self::local()
    }
}

impl CacheService for CacheBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.get(key).await,
            Self::Local(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.set(key, value, ttl).await,
            Self::Local(s) => s.set(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.delete(key).await,
            Self::Local(s) => s.delete(key).await,
        }
    }

    async fn delete_pattern(&self, prefix: &str, pattern: &str) -> CacheResult<u64> {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.delete_pattern(prefix, pattern).await,
            Self::Local(s) => s.delete_pattern(prefix, pattern).await,
        }
    }

    async fn clear(&self) -> CacheResult<()> {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.clear().await,
            Self::Local(s) => s.clear().await,
        }
    }

    async fn health_check(&self) -> CacheResult<bool> {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.health_check().await,
            Self::Local(s) => s.health_check().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.provider_name(),
            Self::Local(s) => s.provider_name(),
        }
    }

    fn is_distributed(&self) -> bool {
        match self {
            #[cfg(feature = "cache-redis")]
            Self::Redis(s) => s.is_distributed(),
            Self::Local(s) => s.is_distributed(),
        }
    }
}

/// Upper bound for one backend call when no configuration supplies one
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(2000);

/// Fail-open cache facade
///
/// Build one at process start with [`Cache::bootstrap`] and hand clones to
/// every consumer; clones share the backend and the statistics.
///
/// ## Guarantees
///
/// - `get` returns `None` on miss *and* on any failure
/// - `set`, `delete`, `delete_pattern`, `clear` never report failure
/// - the backend chosen at construction never changes
/// - no call waits on the backend longer than the operation timeout
pub struct Cache<S = CacheBackend> {
    inner: Arc<CacheInner<S>>,
}

struct CacheInner<S> {
    service: S,
    stats: CacheStats,
    operation_timeout: Duration,
}

impl<S> Clone for Cache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Cache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("service", &self.inner.service)
            .field("stats", &self.inner.stats.snapshot())
            .field("operation_timeout", &self.inner.operation_timeout)
            .finish()
    }
}

impl Cache<CacheBackend> {
    /// Select the backend once from configuration
    ///
    /// Redis is used only when enabled and answering PING within the
    /// configured timeout; otherwise the process runs on the local store.
    pub async fn bootstrap(config: &CacheConfig) -> Self {
        let cache = Self::with_service_and_timeout(
            CacheBackend::from_config(config).await,
            config.redis.response_timeout(),
        );
        info!(
            provider = cache.provider_name(),
            distributed = cache.is_distributed(),
            "Cache bootstrapped"
        );
        cache
    }

    /// Facade over a fresh local store
    pub fn local() -> Self {
        Self::with_service(CacheBackend::local())
    }
}

impl<S: CacheService> Cache<S> {
    pub fn with_service(service: S) -> Self {
        Self::with_service_and_timeout(service, DEFAULT_OPERATION_TIMEOUT)
    }

    /// Facade whose backend calls are abandoned after `operation_timeout`
    pub fn with_service_and_timeout(service: S, operation_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                service,
                stats: CacheStats::new(),
                operation_timeout,
            }),
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        self.inner.operation_timeout
    }

    pub fn service(&self) -> &S {
        &self.inner.service
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.service.provider_name()
    }

    /// True when backed by the shared networked cache
    pub fn is_distributed(&self) -> bool {
        self.inner.service.is_distributed()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Get a value, treating every failure as a miss
    pub async fn get<T: DeserializeOwned>(&self, prefix: &str, key: &str) -> Option<T> {
        let cache_key = cache_key(prefix, key);

        match self.read(&cache_key).await {
            Ok(Some(value)) => {
                self.inner.stats.record_hit();
                debug!(key = %cache_key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                self.inner.stats.record_miss();
                debug!(key = %cache_key, "Cache miss");
                None
            }
            Err(e) => {
                self.inner.stats.record_error();
                error!(key = %cache_key, error = %e, "Cache get error");
                None
            }
        }
    }

    /// Get a value as untyped JSON
    pub async fn get_value(&self, prefix: &str, key: &str) -> Option<serde_json::Value> {
        self.get(prefix, key).await
    }

    /// Store a value; failures are logged and dropped
    ///
    /// The local store keeps the value until it is deleted or cleared,
    /// whatever `ttl` says.
    pub async fn set<T>(&self, prefix: &str, key: &str, value: &T, ttl: impl Into<Ttl>)
    where
        T: Serialize + ?Sized,
    {
        let cache_key = cache_key(prefix, key);
        let ttl = ttl.into();

        match self.write(&cache_key, value, ttl).await {
            Ok(()) => {
                self.inner.stats.record_write();
                debug!(key = %cache_key, ttl_seconds = ttl.as_secs(), "Cache set");
            }
            Err(e) => {
                self.inner.stats.record_error();
                error!(key = %cache_key, ttl_seconds = ttl.as_secs(), error = %e, "Cache set error");
            }
        }
    }

    /// Store a value with the default (medium) TTL
    pub async fn set_default<T>(&self, prefix: &str, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        self.set(prefix, key, value, Ttl::default()).await;
    }

    /// Remove one key; absent keys are not an error
    pub async fn delete(&self, prefix: &str, key: &str) {
        let cache_key = cache_key(prefix, key);

        match self
            .bounded("DEL", self.inner.service.delete(&cache_key))
            .await
        {
            Ok(()) => debug!(key = %cache_key, "Cache delete"),
            Err(e) => {
                self.inner.stats.record_error();
                error!(key = %cache_key, error = %e, "Cache delete error");
            }
        }
    }

    /// Remove keys under `prefix` whose suffix matches the glob `pattern`
    ///
    /// On the local store the pattern is not evaluated and every key under
    /// `prefix` is removed. Returns the number of keys removed (0 on failure).
    pub async fn delete_pattern(&self, prefix: &str, pattern: &str) -> u64 {
        match self
            .bounded("SCAN/DEL", self.inner.service.delete_pattern(prefix, pattern))
            .await
        {
            Ok(deleted) => {
                debug!(prefix = prefix, pattern = pattern, deleted = deleted, "Cache delete pattern");
                deleted
            }
            Err(e) => {
                self.inner.stats.record_error();
                error!(prefix = prefix, pattern = pattern, error = %e, "Cache delete pattern error");
                0
            }
        }
    }

    /// Wipe every namespace in the active backend
    pub async fn clear(&self) {
        match self.bounded("FLUSHDB", self.inner.service.clear()).await {
            Ok(()) => debug!(provider = self.provider_name(), "Cache cleared"),
            Err(e) => {
                self.inner.stats.record_error();
                error!(error = %e, "Cache clear error");
            }
        }
    }

    /// Report the networked cache status; never fails
    pub async fn health(&self) -> CacheHealth {
        if !self.is_distributed() {
            return CacheHealth::Disabled;
        }

        match self
            .bounded("PING", self.inner.service.health_check())
            .await
        {
            Ok(true) => CacheHealth::Healthy,
            Ok(false) => CacheHealth::Unhealthy {
                error: "unexpected health check reply".to_string(),
            },
            Err(e) => CacheHealth::Unhealthy {
                error: e.to_string(),
            },
        }
    }

    async fn read<T: DeserializeOwned>(&self, cache_key: &str) -> CacheResult<Option<T>> {
        let raw = self.bounded("GET", self.inner.service.get(cache_key)).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(CacheError::from)
    }

    async fn write<T>(&self, cache_key: &str, value: &T, ttl: Ttl) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.bounded(
            "SET",
            self.inner.service.set(cache_key, &json, ttl.as_duration()),
        )
        .await
    }

    /// Run one backend call, giving up once the operation timeout elapses
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = CacheResult<T>>,
    ) -> CacheResult<T> {
        let limit = self.inner.operation_timeout;
        tokio::time::timeout(limit, call).await.map_err(|_| {
            CacheError::Timeout(format!(
                "{} not answered within {}ms",
                operation,
                limit.as_millis()
            ))
        })?
    }
}
