//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session validity window in hours from creation.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Whether the session cookie carries the `Secure` attribute.
    /// Disable only for plain-HTTP development setups.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// Interval for the expired-session sweeper in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            cookie_secure: default_true(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

impl SessionConfig {
    /// Session TTL as a chrono-free duration in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        (self.ttl_hours * 3600) as i64
    }
}

fn default_ttl_hours() -> u64 {
    12
}

fn default_true() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    15
}
