//! Namespaces, TTL presets, and composite key construction
//!
//! Namespaces partition the key space by entity kind. Their string forms are
//! part of the stored key and are what pattern invalidation matches on, so they
//! must not change between releases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const CACHE_DEALS: &str = "deals";
pub const CACHE_BORROWERS: &str = "borrowers";
pub const CACHE_USERS: &str = "users";
pub const CACHE_ORGANIZATIONS: &str = "orgs";
pub const CACHE_UNDERWRITING: &str = "underwriting";
pub const CACHE_DOCUMENTS: &str = "documents";

pub const TTL_SHORT: u64 = 60;
pub const TTL_MEDIUM: u64 = 300;
pub const TTL_LONG: u64 = 1800;
pub const TTL_VERY_LONG: u64 = 3600;

/// Separator between a namespace and the caller's key
pub const KEY_SEPARATOR: char = ':';

/// Pattern that matches every key in a namespace
pub const ALL_KEYS: &str = "*";

/// Entity kinds with a reserved cache prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Deals,
    Borrowers,
    Users,
    #[serde(rename = "orgs")]
    Organizations,
    Underwriting,
    Documents,
}

impl Namespace {
    pub const ALL: [Namespace; 6] = [
        Namespace::Deals,
        Namespace::Borrowers,
        Namespace::Users,
        Namespace::Organizations,
        Namespace::Underwriting,
        Namespace::Documents,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Namespace::Deals => CACHE_DEALS,
            Namespace::Borrowers => CACHE_BORROWERS,
            Namespace::Users => CACHE_USERS,
            Namespace::Organizations => CACHE_ORGANIZATIONS,
            Namespace::Underwriting => CACHE_UNDERWRITING,
            Namespace::Documents => CACHE_DOCUMENTS,
        }
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-to-live for a cache entry
///
/// Only the Redis backend enforces it; the local store accepts and ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ttl {
    /// 1 minute
    Short,
    /// 5 minutes
    #[default]
    Medium,
    /// 30 minutes
    Long,
    /// 1 hour
    VeryLong,
    Seconds(u64),
}

impl Ttl {
    pub const fn as_secs(self) -> u64 {
        match self {
            Ttl::Short => TTL_SHORT,
            Ttl::Medium => TTL_MEDIUM,
            Ttl::Long => TTL_LONG,
            Ttl::VeryLong => TTL_VERY_LONG,
            Ttl::Seconds(secs) => secs,
        }
    }

    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.as_secs())
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::Seconds(duration.as_secs())
    }
}

/// Build the stored key for `key` inside `prefix`
pub fn cache_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{KEY_SEPARATOR}{key}")
}
