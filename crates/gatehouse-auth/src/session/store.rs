//! Session lifecycle operations over the session repository.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{debug, warn};

use gatehouse_core::config::SessionConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_database::SessionRepository;
use gatehouse_entity::client::ClientInfo;
use gatehouse_entity::session::Session;
use gatehouse_entity::token::ApiToken;
use gatehouse_entity::user::User;

/// Random bytes behind a session token. Encoded URL-safe for cookie use.
const TOKEN_BYTES: usize = 32;

/// Generate an opaque session token.
///
/// The raw value only ever travels in the cookie; the database stores it
/// as the session's primary key.
fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Session lifecycle logic on top of [`SessionRepository`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Session persistence port.
    repo: Arc<dyn SessionRepository>,
    /// Session configuration.
    config: SessionConfig,
}

impl SessionStore {
    /// Create a new session store.
    pub fn new(repo: Arc<dyn SessionRepository>, config: SessionConfig) -> Self {
        Self { repo, config }
    }

    /// Create and persist a session for a freshly authenticated user.
    pub async fn new_session(
        &self,
        user: &User,
        provider: &str,
        created_from: &str,
        client: ClientInfo,
    ) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            token: generate_session_token(),
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_authenticated: true,
            is_admin: user.is_admin,
            provider: provider.to_string(),
            created_from: created_from.to_string(),
            valid_until: now + Duration::seconds(self.config.ttl_seconds()),
            closed_on: None,
            last_activity: now,
            created_at: now,
            client,
        };

        self.repo.insert(&session).await?;

        debug!(
            user_id = %session.user_id,
            provider = %session.provider,
            "Session created"
        );
        Ok(session)
    }

    /// Validate a session token.
    ///
    /// Not a pure read: a session observed past its window is closed here
    /// as a side effect, and a valid session gets `last_activity` bumped.
    /// `Ok(None)` covers unknown, closed, and expired tokens alike; only
    /// repository failures surface as errors.
    pub async fn validate_session(&self, token: &str) -> AppResult<Option<Session>> {
        let Some(mut session) = self.repo.find_by_token(token).await? else {
            debug!("Session validation failed: unknown token");
            return Ok(None);
        };

        if session.is_closed() {
            debug!(user_id = %session.user_id, "Session validation failed: already closed");
            return Ok(None);
        }

        let now = Utc::now();
        if session.is_expired_at(now) {
            // Lazy expiry. A concurrent validation may win the close race;
            // the outcome for this caller is the same either way.
            match self.repo.close(token, now).await {
                Ok(true) => {
                    debug!(user_id = %session.user_id, "Closed expired session");
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(user_id = %session.user_id, error = %e, "Failed to close expired session");
                }
            }
            return Ok(None);
        }

        self.repo.update_last_activity(token, now).await?;
        session.last_activity = now;
        Ok(Some(session))
    }

    /// Close a session explicitly.
    ///
    /// Unlike the lazy close inside [`Self::validate_session`], failure
    /// causes are reported: an unknown token is a not-found error and a
    /// token that was already closed is a conflict.
    pub async fn end_session(&self, token: &str) -> AppResult<()> {
        if self.repo.close(token, Utc::now()).await? {
            return Ok(());
        }

        match self.repo.find_by_token(token).await? {
            None => Err(AppError::not_found("Session not found")),
            Some(_) => Err(AppError::conflict("Session already closed")),
        }
    }

    /// Synthesize the ephemeral session describing a token-authenticated
    /// caller. Never persisted; the `token` field stays empty so it can
    /// not collide with cookie sessions anywhere downstream.
    pub fn token_session(&self, token: &ApiToken, user: &User, client: ClientInfo) -> Session {
        let now = Utc::now();
        Session {
            token: String::new(),
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_authenticated: true,
            is_admin: user.is_admin,
            provider: "api_token".to_string(),
            created_from: token.created_from.clone(),
            valid_until: now + Duration::seconds(self.config.ttl_seconds()),
            closed_on: None,
            last_activity: now,
            created_at: now,
            client,
        }
    }

    /// Currently valid sessions, most recent first.
    pub async fn list_active(&self, limit: i64) -> AppResult<Vec<Session>> {
        self.repo.list_active(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_database::memory::session::InMemorySessionRepository;

    fn store() -> (Arc<InMemorySessionRepository>, SessionStore) {
        let repo = Arc::new(InMemorySessionRepository::new());
        let store = SessionStore::new(repo.clone(), SessionConfig::default());
        (repo, store)
    }

    fn test_user(is_admin: bool) -> User {
        User {
            id: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            is_admin,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_new_session_roundtrip() {
        let (_, store) = store();
        let user = test_user(true);

        let session = store
            .new_session(&user, "local", "web", ClientInfo::default())
            .await
            .unwrap();
        assert!(session.is_admin);
        assert!(session.is_valid());

        let validated = store.validate_session(&session.token).await.unwrap().unwrap();
        assert_eq!(validated.user_id, user.id);
        assert!(validated.is_admin);
    }

    #[tokio::test]
    async fn test_validate_unknown_token_is_negative_not_error() {
        let (_, store) = store();
        assert!(store.validate_session("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_closed_on_validation() {
        let (repo, store) = store();
        let user = test_user(false);
        let now = Utc::now();
        let expired = Session {
            token: "expired-token".to_string(),
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_authenticated: true,
            is_admin: false,
            provider: "local".to_string(),
            created_from: "web".to_string(),
            valid_until: now - Duration::minutes(1),
            closed_on: None,
            last_activity: now - Duration::hours(1),
            created_at: now - Duration::hours(1),
            client: ClientInfo::default(),
        };
        repo.insert(&expired).await.unwrap();

        assert!(store.validate_session("expired-token").await.unwrap().is_none());

        let raw = repo.find_by_token("expired-token").await.unwrap().unwrap();
        assert!(raw.closed_on.is_some());
    }

    #[tokio::test]
    async fn test_end_session_then_validate_is_negative() {
        let (_, store) = store();
        let user = test_user(false);
        let session = store
            .new_session(&user, "local", "web", ClientInfo::default())
            .await
            .unwrap();

        store.end_session(&session.token).await.unwrap();
        assert!(store.validate_session(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_double_end_session_is_conflict() {
        let (_, store) = store();
        let user = test_user(false);
        let session = store
            .new_session(&user, "local", "web", ClientInfo::default())
            .await
            .unwrap();

        store.end_session(&session.token).await.unwrap();
        let err = store.end_session(&session.token).await.unwrap_err();
        assert_eq!(err.kind, gatehouse_core::error::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_end_unknown_session_is_not_found() {
        let (_, store) = store();
        let err = store.end_session("missing").await.unwrap_err();
        assert_eq!(err.kind, gatehouse_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_token_session_is_ephemeral() {
        let (repo, store) = store();
        let user = test_user(true);
        let api_token = ApiToken {
            id: uuid::Uuid::new_v4(),
            user_id: user.id,
            name: "ci".to_string(),
            token_hash: "hash".to_string(),
            scopes: Vec::new(),
            is_active: true,
            usage_count: 0,
            last_used_at: None,
            expires_at: None,
            revoked_at: None,
            revoked_by: None,
            created_from: "web".to_string(),
            created_at: Utc::now(),
        };

        let session = store.token_session(&api_token, &user, ClientInfo::default());
        assert!(session.token.is_empty());
        assert!(session.is_admin);
        assert_eq!(session.provider, "api_token");
        // Nothing was persisted.
        assert!(repo.find_by_token("").await.unwrap().is_none());
    }

    #[test]
    fn test_generated_tokens_are_unique_and_url_safe() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
