//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatehouse_auth::client::FingerprintCacheStats;
use gatehouse_entity::session::Session;
use gatehouse_entity::token::ApiToken;

use crate::middleware::traffic::TrafficStatsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Session summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Opaque session token.
    pub token: String,
    /// Owning user id.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Whether the user holds admin privileges.
    pub is_admin: bool,
    /// Identity provider.
    pub provider: String,
    /// Where the session was created from.
    pub created_from: String,
    /// Client IP address.
    pub ip_address: String,
    /// Browser family.
    pub browser_family: String,
    /// Operating system family.
    pub os_family: String,
    /// Device class.
    pub device_family: String,
    /// Expiry instant.
    pub valid_until: DateTime<Utc>,
    /// Last observed request.
    pub last_activity: DateTime<Utc>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user_id: session.user_id,
            username: session.username.clone(),
            email: session.email.clone(),
            is_admin: session.is_admin,
            provider: session.provider.clone(),
            created_from: session.created_from.clone(),
            ip_address: session.client.ip_address.clone(),
            browser_family: session.client.browser_family.clone(),
            os_family: session.client.os_family.clone(),
            device_family: session.client.device_family.clone(),
            valid_until: session.valid_until,
            last_activity: session.last_activity,
            created_at: session.created_at,
        }
    }
}

/// Current identity response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// Owning user id.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Whether the user holds admin privileges.
    pub is_admin: bool,
    /// How the request was authenticated (`cookie` or `token`).
    pub auth_method: String,
    /// Expiry instant of the backing session.
    pub valid_until: DateTime<Utc>,
}

/// API token summary. Never carries the secret or its hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Token id.
    pub id: Uuid,
    /// Owning user id.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Whether the token is currently usable.
    pub is_active: bool,
    /// Number of successful validations.
    pub usage_count: i64,
    /// Last successful validation.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Expiry instant, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Revocation instant, if revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl From<&ApiToken> for TokenResponse {
    fn from(token: &ApiToken) -> Self {
        Self {
            id: token.id,
            user_id: token.user_id,
            name: token.name.clone(),
            scopes: token.scopes.clone(),
            is_active: token.is_active,
            usage_count: token.usage_count,
            last_used_at: token.last_used_at,
            expires_at: token.expires_at,
            revoked_at: token.revoked_at,
            created_at: token.created_at,
        }
    }
}

/// Response for a freshly issued token.
///
/// The plaintext secret appears here once and is never retrievable again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCreatedResponse {
    /// The plaintext token secret.
    pub token: String,
    /// Metadata of the stored token.
    pub details: TokenResponse,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// Aggregate observability response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Process-wide traffic counters.
    pub traffic: TrafficStatsSnapshot,
    /// Fingerprint cache effectiveness.
    pub fingerprint_cache: FingerprintCacheStats,
}
