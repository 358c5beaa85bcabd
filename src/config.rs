//! # Cache Configuration
//!
//! Settings that decide which backend [`Cache::bootstrap`](crate::cache::Cache::bootstrap)
//! selects. Values come from `REDIS_*` environment variables layered over
//! defaults with the `config` crate:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `REDIS_ENABLED` | `false` |
//! | `REDIS_URL` | `redis://localhost:6379/0` |
//! | `REDIS_CONNECTION_TIMEOUT_SECONDS` | `5` |
//! | `REDIS_RESPONSE_TIMEOUT_MS` | `2000` |
//!
//! `REDIS_ENABLED` is lenient: anything other than a true value (`true` in any
//! case, or a non-zero number) leaves Redis off, with a warning when the value
//! is not recognised.

use crate::error::{ConfigResult, ConfigurationError};
use config::{Config, Environment};
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";
pub const DEFAULT_CONNECTION_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 2000;

const ENV_PREFIX: &str = "REDIS";

/// Networked cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    #[serde(deserialize_with = "deserialize_enabled")]
    pub enabled: bool,
    pub url: String,
    /// Upper bound for connecting and the bootstrap PING
    pub connection_timeout_seconds: u64,
    /// Upper bound for every cache command after bootstrap
    pub response_timeout_ms: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnabledFlag {
    Bool(bool),
    Int(i64),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let enabled = match EnabledFlag::deserialize(deserializer)? {
        EnabledFlag::Bool(flag) => flag,
        EnabledFlag::Int(n) => n != 0,
        EnabledFlag::Text(text) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                true
            } else {
                if !text.is_empty() && !text.eq_ignore_ascii_case("false") {
                    warn!(value = text, "Unrecognised REDIS_ENABLED value, treating as false");
                }
                false
            }
        }
        EnabledFlag::Other(_) => {
            warn!("Unrecognised REDIS_ENABLED value, treating as false");
            false
        }
    };
    Ok(enabled)
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: DEFAULT_REDIS_URL.to_string(),
            connection_timeout_seconds: DEFAULT_CONNECTION_TIMEOUT_SECONDS,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
        }
    }
}

impl RedisConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_seconds)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

/// Top-level cache configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis: RedisConfig,
}

impl CacheConfig {
    /// Configuration that always selects the local store
    pub fn local_only() -> Self {
        Self::default()
    }

    /// Configuration that asks for Redis at `url`
    pub fn with_redis(url: impl Into<String>) -> Self {
        Self {
            redis: RedisConfig {
                enabled: true,
                url: url.into(),
                ..RedisConfig::default()
            },
        }
    }

    /// Load from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(None)
    }

    /// Load from an explicit variable map, using the same names as the environment
    ///
    /// Nothing is read from the process environment, which keeps tests isolated.
    pub fn from_source(vars: HashMap<String, String>) -> ConfigResult<Self> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> ConfigResult<Self> {
        let defaults = RedisConfig::default();

        let settings = Config::builder()
            .set_default("enabled", defaults.enabled)?
            .set_default("url", defaults.url)?
            .set_default(
                "connection_timeout_seconds",
                defaults.connection_timeout_seconds as i64,
            )?
            .set_default("response_timeout_ms", defaults.response_timeout_ms as i64)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?;

        let redis: RedisConfig = settings.try_deserialize()?;
        let config = Self { redis };
        config.validate()?;

        info!(
            redis_enabled = config.redis.enabled,
            connection_timeout_seconds = config.redis.connection_timeout_seconds,
            response_timeout_ms = config.redis.response_timeout_ms,
            "Cache configuration loaded"
        );

        Ok(config)
    }

    /// Reject settings that can never produce a working Redis backend
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.redis.enabled {
            return Ok(());
        }

        if self.redis.url.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "redis.url",
                "must not be empty when Redis is enabled",
            ));
        }

        if self.redis.connection_timeout_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "redis.connection_timeout_seconds",
                "must be greater than zero",
            ));
        }

        if self.redis.response_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "redis.response_timeout_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}
