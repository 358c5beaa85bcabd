//! Error types for the caching layer.
//!
//! Cache errors never cross the [`Cache`](crate::cache::Cache) facade; they exist
//! so backends can report what went wrong and the facade can log it before
//! collapsing the outcome to a hit or a miss. Configuration errors are the only
//! errors a caller can observe, and only while loading settings.

use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to connect to cache backend
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    /// Failed to serialize or deserialize cache value
    #[error("Cache serialization error: {0}")]
    SerializationError(String),

    /// Cache operation timed out
    #[error("Cache operation timed out: {0}")]
    Timeout(String),

    /// Generic backend error
    #[error("Cache backend error: {0}")]
    BackendError(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::SerializationError(e.to_string())
    }
}

/// Errors raised while loading or validating [`CacheConfig`](crate::config::CacheConfig)
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    LoadError(String),
}

impl ConfigurationError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(e: config::ConfigError) -> Self {
        ConfigurationError::LoadError(e.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
