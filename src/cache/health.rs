//! Cache health reporting
//!
//! Mirrors how the rest of the application reports dependencies: a local store
//! means the networked cache is `disabled`, otherwise a PING decides between
//! `healthy` and `unhealthy`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CacheHealth {
    /// No networked cache in use; the process is running on the local store
    Disabled,
    Healthy,
    Unhealthy { error: String },
}

impl CacheHealth {
    /// True unless the networked cache is in use and failing
    pub fn is_operational(&self) -> bool {
        !matches!(self, CacheHealth::Unhealthy { .. })
    }
}
