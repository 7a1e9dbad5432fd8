//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// HTTP server and routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// URL prefix under which the management UI and API are mounted.
    #[serde(default = "default_management_prefix")]
    pub management_prefix: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Allowed CORS origins. An empty list allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// The management mount point, normalized to a leading slash and no
    /// trailing slash. Falls back to the default when configured empty.
    pub fn management_mount(&self) -> String {
        let trimmed = self.management_prefix.trim_matches('/');
        if trimmed.is_empty() {
            default_management_prefix()
        } else {
            format!("/{trimmed}")
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            management_prefix: default_management_prefix(),
            max_body_bytes: default_max_body_bytes(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_management_prefix() -> String {
    "/admin".to_string()
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}
