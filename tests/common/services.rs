use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use underwrite_cache::{CacheError, CacheResult, CacheService, LocalCacheService};

/// Networked-looking backend whose connection can be cut and restored
///
/// Stores into a local map while up and fails every call while down, which
/// lets tests drive the facade through an outage and back.
#[derive(Debug, Clone, Default)]
pub struct SwitchableService {
    store: LocalCacheService,
    down: Arc<AtomicBool>,
}

impl SwitchableService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    pub fn come_back(&self) {
        self.down.store(false, Ordering::SeqCst);
    }

    pub fn stored_entries(&self) -> usize {
        self.store.len()
    }

    fn check(&self) -> CacheResult<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(CacheError::ConnectionError("connection reset by peer".to_string()))
        } else {
            Ok(())
        }
    }
}

impl CacheService for SwitchableService {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.check()?;
        self.store.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.check()?;
        self.store.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.check()?;
        self.store.delete(key).await
    }

    async fn delete_pattern(&self, prefix: &str, pattern: &str) -> CacheResult<u64> {
        self.check()?;
        self.store.delete_pattern(prefix, pattern).await
    }

    async fn clear(&self) -> CacheResult<()> {
        self.check()?;
        self.store.clear().await
    }

    async fn health_check(&self) -> CacheResult<bool> {
        self.check()?;
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "switchable"
    }

    fn is_distributed(&self) -> bool {
        true
    }
}

/// Backend that accepts connections but never answers a command
#[derive(Debug, Clone, Default)]
pub struct HangingService;

impl CacheService for HangingService {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        std::future::pending().await
    }

    async fn delete_pattern(&self, _prefix: &str, _pattern: &str) -> CacheResult<u64> {
        std::future::pending().await
    }

    async fn clear(&self) -> CacheResult<()> {
        std::future::pending().await
    }

    async fn health_check(&self) -> CacheResult<bool> {
        std::future::pending().await
    }

    fn provider_name(&self) -> &'static str {
        "hanging"
    }

    fn is_distributed(&self) -> bool {
        true
    }
}
