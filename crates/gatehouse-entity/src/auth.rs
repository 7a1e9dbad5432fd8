//! Request-scoped authentication result.

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// How a request was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Session cookie.
    Cookie,
    /// Bearer API token.
    Token,
    /// No usable credential.
    None,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Cookie => write!(f, "cookie"),
            AuthMethod::Token => write!(f, "token"),
            AuthMethod::None => write!(f, "none"),
        }
    }
}

/// The outcome of credential resolution for one request.
///
/// Ephemeral: lives in request extensions only and is never persisted.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// The resolved session. For bearer authentication this is a
    /// synthesized, never-persisted session describing the token owner.
    pub session: Option<Session>,
    /// Which credential won the resolution.
    pub method: AuthMethod,
}

impl AuthenticationResult {
    /// An unauthenticated result.
    pub fn anonymous() -> Self {
        Self {
            session: None,
            method: AuthMethod::None,
        }
    }

    /// Whether an authenticated identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_authenticated)
    }

    /// Whether the authenticated identity holds admin privileges.
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.is_admin)
    }
}
