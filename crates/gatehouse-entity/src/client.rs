//! Client metadata value object.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Client metadata captured at request time.
///
/// Embedded in both [`crate::session::Session`] and
/// [`crate::metric::TrafficMetric`] rows (columns are flattened into the
/// owning table). Geo attributes come from an external resolver and stay
/// empty when none is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ClientInfo {
    /// Client IP address as reported by forwarding headers or the socket.
    pub ip_address: String,
    /// Raw User-Agent header value.
    pub user_agent: String,
    /// Browser family parsed from the User-Agent (e.g. `"Firefox"`).
    pub browser_family: String,
    /// Browser major version (empty when unknown).
    pub browser_version: String,
    /// Operating system family (e.g. `"Windows"`).
    pub os_family: String,
    /// Operating system version (empty when unknown).
    pub os_version: String,
    /// Device family: `"Desktop"`, `"Mobile"`, `"Tablet"`, `"Bot"`, or `"Other"`.
    pub device_family: String,
    /// ISO country code from geo resolution.
    pub country_code: Option<String>,
    /// Region/subdivision name from geo resolution.
    pub region: Option<String>,
    /// City name from geo resolution.
    pub city: Option<String>,
    /// Opaque client fingerprint derived from request characteristics.
    pub fingerprint: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            ip_address: "unknown".to_string(),
            user_agent: String::new(),
            browser_family: "Other".to_string(),
            browser_version: String::new(),
            os_family: "Other".to_string(),
            os_version: String::new(),
            device_family: "Other".to_string(),
            country_code: None,
            region: None,
            city: None,
            fingerprint: String::new(),
        }
    }
}
