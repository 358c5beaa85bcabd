//! In-process fallback store
//!
//! Used when Redis is disabled or unreachable at bootstrap. Entries live until
//! they are deleted, the store is cleared, or the process exits; TTLs are
//! accepted and ignored.
//!
//! **Important**: this store is NOT distributed. Each process has its own map,
//! so invalidations in one process are invisible to the others.

use crate::cache::keys::KEY_SEPARATOR;
use crate::cache::traits::CacheService;
use crate::error::CacheResult;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Concurrent in-memory cache service
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct LocalCacheService {
    entries: Arc<DashMap<String, String>>,
}

impl std::fmt::Debug for LocalCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCacheService")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}

impl LocalCacheService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every key stored under `prefix`
    pub fn delete_prefix(&self, prefix: &str) -> u64 {
        let needle = format!("{prefix}{KEY_SEPARATOR}");
        let mut removed: u64 = 0;
        self.entries.retain(|key, _| {
            let keep = !key.starts_with(&needle);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

impl CacheService for LocalCacheService {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let result = self.entries.get(key).map(|entry| entry.value().clone());

        if result.is_some() {
            debug!(key = key, "Cache HIT (local)");
        } else {
            debug!(key = key, "Cache MISS (local)");
        }

        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(key.to_string(), value.to_string());

        debug!(
            key = key,
            requested_ttl_seconds = ttl.as_secs(),
            "Cache SET (local, TTL not enforced)"
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        debug!(key = key, "Cache DEL (local)");
        Ok(())
    }

    async fn delete_pattern(&self, prefix: &str, pattern: &str) -> CacheResult<u64> {
        // Only the prefix is honored here; the glob suffix is not evaluated.
        let deleted = self.delete_prefix(prefix);
        debug!(
            prefix = prefix,
            pattern = pattern,
            deleted = deleted,
            "Cache pattern DEL (local, matched by prefix only)"
        );
        Ok(deleted)
    }

    async fn clear(&self) -> CacheResult<()> {
        self.entries.clear();
        debug!("Cache CLEAR (local)");
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }

    fn is_distributed(&self) -> bool {
        false
    }
}
