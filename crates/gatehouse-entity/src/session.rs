//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::client::ClientInfo;

/// A browser session.
///
/// Sessions are created on login and closed on logout, expiry, or admin
/// termination. Closed sessions keep their row forever; `closed_on` is
/// set at most once and never cleared.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque random session token (primary key). Carried in the session
    /// cookie; empty for ephemeral bearer-token sessions.
    pub token: String,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Username snapshot at login time.
    pub username: String,
    /// Email snapshot at login time.
    pub email: String,
    /// Whether the session represents an authenticated principal.
    pub is_authenticated: bool,
    /// Whether the session carries admin privileges.
    pub is_admin: bool,
    /// Identity provider that authenticated the user (e.g. `"local"`).
    pub provider: String,
    /// Where the session was created from (e.g. `"web"`, `"token-auth"`).
    pub created_from: String,

    // -- Lifecycle --
    /// End of the validity window.
    pub valid_until: DateTime<Utc>,
    /// When the session was closed. `None` while the session is open.
    pub closed_on: Option<DateTime<Utc>>,
    /// Last request timestamp.
    pub last_activity: DateTime<Utc>,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,

    // -- Client snapshot --
    /// Client metadata captured at login.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub client: ClientInfo,
}

impl Session {
    /// Check whether the session is valid: open and inside its window.
    pub fn is_valid(&self) -> bool {
        self.closed_on.is_none() && self.valid_until > Utc::now()
    }

    /// Check whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed_on.is_some()
    }

    /// Check whether the validity window has elapsed. The boundary
    /// instant itself counts as expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit clock.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until <= now
    }
}
