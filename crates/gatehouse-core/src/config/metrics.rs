//! Traffic metrics configuration.

use serde::{Deserialize, Serialize};

/// Traffic metric capture and retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether per-request traffic metrics are captured at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long persisted metrics are retained, in days.
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> u64 {
    30
}
