//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user account.
///
/// Account management lives in an external system; Gatehouse reads users
/// through the directory port and only distinguishes the binary admin
/// privilege.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the user holds admin privileges.
    pub is_admin: bool,
    /// Whether the account may authenticate at all.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
