//! # Fail-Open Cache Layer
//!
//! Namespaced, TTL-bounded caching for read-heavy lookups (deals, borrowers,
//! users, organizations, underwriting results, documents) with a shared Redis
//! backend and an in-process fallback.
//!
//! ## Architecture
//!
//! ```text
//! Cache<S> (facade)                   <- Typed JSON values, fail-open, stats
//!   └── CacheBackend (enum)           <- Chosen once at bootstrap
//!         ├── Redis(RedisCacheService)  <- ConnectionManager, SETEX/SCAN/FLUSHDB
//!         └── Local(LocalCacheService)  <- DashMap, no expiry
//! Memoized<F, S>                      <- Cache-first wrapper keyed by Fingerprint
//! ```
//!
//! ## Design Decisions
//!
//! - **Enum dispatch**: the backend never changes after bootstrap
//! - **Graceful degradation**: unreachable Redis → local store, never blocks startup
//! - **Fail-open**: read errors become misses, write errors are logged and dropped
//! - **Bounded calls**: every backend call is abandoned after the operation timeout
//! - **SCAN for patterns**: non-blocking key iteration (never uses KEYS)
//!
//! Keys are `"{prefix}:{key}"`. The local store ignores TTLs and treats every
//! `delete_pattern` as "everything under the prefix"; Redis honours both.

pub mod fingerprint;
pub mod health;
pub mod keys;
pub mod memoize;
pub mod provider;
pub mod providers;
pub mod stats;
pub mod traits;

pub use crate::error::{CacheError, CacheResult};
pub use fingerprint::{CallArgs, Fingerprint, FingerprintArgs};
pub use health::CacheHealth;
pub use keys::{
    cache_key, Namespace, Ttl, ALL_KEYS, CACHE_BORROWERS, CACHE_DEALS, CACHE_DOCUMENTS,
    CACHE_ORGANIZATIONS, CACHE_UNDERWRITING, CACHE_USERS, TTL_LONG, TTL_MEDIUM, TTL_SHORT,
    TTL_VERY_LONG,
};
pub use memoize::{invalidate_cache, Memoized};
pub use provider::{Cache, CacheBackend, DEFAULT_OPERATION_TIMEOUT};
pub use providers::LocalCacheService;
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use traits::CacheService;

#[cfg(feature = "cache-redis")]
pub use providers::RedisCacheService;
