//! API token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A long-lived API token for programmatic access.
///
/// Only the SHA-256 hash of the secret is stored; the plaintext is shown
/// exactly once at creation. Revocation is permanent: a revoked token
/// never becomes active again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiToken {
    /// Unique token identifier.
    pub id: Uuid,
    /// The user who owns this token.
    pub user_id: Uuid,
    /// Human-readable token name.
    pub name: String,
    /// Hex-encoded SHA-256 hash of the plaintext secret.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Informational scope labels. No authorization policy attaches to
    /// these; access beyond the admin flag is out of scope.
    pub scopes: Vec<String>,
    /// Whether the token is currently usable.
    pub is_active: bool,
    /// Number of successful validations. Monotonically increasing.
    pub usage_count: i64,
    /// When the token last authenticated a request.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Optional expiry. `None` means the token never expires.
    pub expires_at: Option<DateTime<Utc>>,

    // -- Revocation --
    /// When the token was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// The user who revoked the token. Set together with `revoked_at`.
    pub revoked_by: Option<Uuid>,

    // -- Provenance --
    /// Where the token was created from (e.g. `"web"`).
    pub created_from: String,
    /// When the token was created.
    pub created_at: DateTime<Utc>,
}

impl ApiToken {
    /// Check whether the token has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check whether the expiry window has elapsed. Tokens without an
    /// expiry never expire. The boundary instant counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }
}
