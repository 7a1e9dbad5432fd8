//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create API token request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTokenRequest {
    /// Display name for the token.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Scopes granted to the token.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Optional expiry. Tokens without one never expire.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Listing limit query parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// The effective limit, clamped to a sane window.
    pub fn effective(&self, default: i64, max: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}
