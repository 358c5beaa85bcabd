#![allow(clippy::doc_markdown)] // Allow technical terms like FLUSHDB, DashMap in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Underwrite Cache
//!
//! Fail-open caching for the underwriting platform's read paths.
//!
//! ## Overview
//!
//! Lookups of deals, borrowers, users, organizations, underwriting results and
//! documents are cached under short namespaces with preset TTLs. A shared Redis
//! instance is used when configured and reachable; otherwise the process keeps
//! running on an in-process store. Cache failures never reach callers: reads
//! degrade to misses and writes to no-ops.
//!
//! ## Module Organization
//!
//! - [`cache`] - Facade, backends, key namespaces, memoization
//! - [`config`] - `REDIS_*` settings loaded with the `config` crate
//! - [`error`] - Structured error handling
//! - [`logging`] - Console and JSON file tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use underwrite_cache::{Cache, CacheConfig, Namespace, Ttl};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! underwrite_cache::logging::init_structured_logging();
//!
//! let config = CacheConfig::from_env()?;
//! let cache = Cache::bootstrap(&config).await;
//!
//! cache
//!     .set(Namespace::Deals.as_str(), "42", &serde_json::json!({"amount": 100000}), Ttl::Short)
//!     .await;
//! let deal: Option<serde_json::Value> = cache.get(Namespace::Deals.as_str(), "42").await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                          # Unit and integration tests, local store only
//! cargo test --features test-services # Also exercise a live Redis at REDIS_URL
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;

pub use cache::{
    cache_key, invalidate_cache, Cache, CacheBackend, CacheHealth, CacheService,
    CacheStatsSnapshot, CallArgs, Fingerprint, FingerprintArgs, LocalCacheService, Memoized,
    Namespace, Ttl,
};
pub use config::{CacheConfig, RedisConfig};
pub use error::{CacheError, CacheResult, ConfigResult, ConfigurationError};

#[cfg(feature = "cache-redis")]
pub use cache::RedisCacheService;
