//! Credential resolution: cookie session first, bearer token second.

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::warn;

use gatehouse_core::error::ErrorKind;
use gatehouse_core::result::AppResult;
use gatehouse_entity::auth::{AuthMethod, AuthenticationResult};
use gatehouse_entity::client::ClientInfo;
use gatehouse_entity::session::Session;

use crate::session::{SessionStore, cookie};
use crate::token::{TokenService, bearer_token};

/// Resolves the caller identity for one request.
///
/// Cookie resolution takes strict precedence: when the request carries a
/// valid session cookie, the Authorization header is never consulted.
#[derive(Debug, Clone)]
pub struct AuthResolver {
    /// Session lifecycle operations.
    sessions: Arc<SessionStore>,
    /// API token validation.
    tokens: Arc<TokenService>,
}

impl AuthResolver {
    /// Create a new resolver.
    pub fn new(sessions: Arc<SessionStore>, tokens: Arc<TokenService>) -> Self {
        Self { sessions, tokens }
    }

    /// Resolve the caller identity from request headers.
    ///
    /// Never fails the request: infrastructure errors degrade to an
    /// unauthenticated result (logged) so the enforcement layer can still
    /// produce its own response.
    pub async fn resolve(&self, headers: &HeaderMap, client: &ClientInfo) -> AuthenticationResult {
        match self.validate_cookie_auth(headers).await {
            Ok(Some(session)) => {
                return AuthenticationResult {
                    session: Some(session),
                    method: AuthMethod::Cookie,
                };
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Cookie resolution failed; continuing unauthenticated");
            }
        }

        match self.validate_token_auth(headers, client).await {
            Ok(Some(session)) => AuthenticationResult {
                session: Some(session),
                method: AuthMethod::Token,
            },
            Ok(None) => AuthenticationResult::anonymous(),
            Err(e) => {
                warn!(error = %e, "Token resolution failed; continuing unauthenticated");
                AuthenticationResult::anonymous()
            }
        }
    }

    /// Cookie-session resolution. `Ok(None)` when no cookie is present
    /// or the session is unknown, closed, or expired.
    pub async fn validate_cookie_auth(&self, headers: &HeaderMap) -> AppResult<Option<Session>> {
        let Some(token) = cookie::session_token(headers) else {
            return Ok(None);
        };
        self.sessions.validate_session(&token).await
    }

    /// Bearer-token resolution, yielding an ephemeral session for the
    /// token owner. `Ok(None)` covers both "no bearer credential" and
    /// "credential rejected"; only infrastructure failures are errors.
    pub async fn validate_token_auth(
        &self,
        headers: &HeaderMap,
        client: &ClientInfo,
    ) -> AppResult<Option<Session>> {
        let Some(credential) = bearer_token(headers) else {
            return Ok(None);
        };

        match self.tokens.validate(&credential).await {
            Ok((user, token)) => {
                Ok(Some(self.sessions.token_session(&token, &user, client.clone())))
            }
            Err(e) if e.kind == ErrorKind::Authentication => Ok(None),
            Err(e) => Err(e),
        }
    }
}
