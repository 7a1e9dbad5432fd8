//! Fingerprint cache configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the in-process fingerprint cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Memory budget for cached fingerprint entries, in bytes. Entry cost
    /// is approximated as key length plus value length.
    #[serde(default = "default_fingerprint_max_bytes")]
    pub fingerprint_max_bytes: u64,
    /// TTL for cached fingerprints in minutes.
    #[serde(default = "default_fingerprint_ttl_minutes")]
    pub fingerprint_ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fingerprint_max_bytes: default_fingerprint_max_bytes(),
            fingerprint_ttl_minutes: default_fingerprint_ttl_minutes(),
        }
    }
}

fn default_fingerprint_max_bytes() -> u64 {
    1024 * 1024
}

fn default_fingerprint_ttl_minutes() -> u64 {
    10
}
