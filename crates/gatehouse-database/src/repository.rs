//! Repository ports.
//!
//! Every port has a PostgreSQL backing under [`crate::postgres`] and an
//! in-memory backing under [`crate::memory`] with identical observable
//! semantics; callers only see these traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gatehouse_core::result::AppResult;
use gatehouse_entity::metric::TrafficMetric;
use gatehouse_entity::session::Session;
use gatehouse_entity::token::ApiToken;
use gatehouse_entity::user::User;

/// Session persistence port.
///
/// Sessions are append-then-mutate records: rows are inserted once,
/// updated in place (activity, close), and never deleted.
#[async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new session.
    async fn insert(&self, session: &Session) -> AppResult<()>;

    /// Look up a session by its token, closed sessions included.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// Record request activity. A missing row is a silent no-op.
    async fn update_last_activity(&self, token: &str, at: DateTime<Utc>) -> AppResult<()>;

    /// Conditionally close a session: sets `closed_on` only where it is
    /// still unset. Returns `true` when this call performed the close,
    /// `false` when the row is missing or already closed.
    async fn close(&self, token: &str, at: DateTime<Utc>) -> AppResult<bool>;

    /// List currently valid sessions, most recent first.
    async fn list_active(&self, limit: i64) -> AppResult<Vec<Session>>;

    /// Bulk-close every open session whose window has elapsed. Returns
    /// the number of sessions closed.
    async fn close_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// API token persistence port.
#[async_trait]
pub trait TokenRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new token record.
    async fn insert(&self, token: &ApiToken) -> AppResult<()>;

    /// Look up a token by the hash of its secret.
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<ApiToken>>;

    /// Look up a token by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ApiToken>>;

    /// List a user's tokens, most recent first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiToken>>;

    /// Record a successful validation: bumps `usage_count` and sets
    /// `last_used_at`.
    async fn record_usage(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Clear `is_active`. Used when expiry is detected during validation.
    async fn deactivate(&self, id: Uuid) -> AppResult<()>;

    /// Conditionally revoke: sets `revoked_at`/`revoked_by` and clears
    /// `is_active` only where `revoked_at` is still unset. Returns `true`
    /// when this call performed the revocation.
    async fn revoke(&self, id: Uuid, revoked_by: Uuid, at: DateTime<Utc>) -> AppResult<bool>;
}

/// Traffic metric persistence port. Rows are write-once.
#[async_trait]
pub trait TrafficMetricRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Append one metric row.
    async fn insert(&self, metric: &TrafficMetric) -> AppResult<()>;

    /// List the most recent metrics, newest first.
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<TrafficMetric>>;

    /// Delete metrics older than the cutoff. Returns rows removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// User directory port.
///
/// Account management is external; Gatehouse only reads accounts and
/// verifies credentials through this port.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Look up a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Look up a user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Verify a password for a username-or-email login. Returns the user
    /// only when the account exists, is active, and the password matches;
    /// every failure mode reads the same from outside.
    async fn verify_credentials(&self, login: &str, password: &str) -> AppResult<Option<User>>;

    /// Seed an account if the username is not taken. Used for the
    /// bootstrap admin; a silent no-op when the user already exists.
    async fn ensure_user(&self, user: &User) -> AppResult<()>;
}
