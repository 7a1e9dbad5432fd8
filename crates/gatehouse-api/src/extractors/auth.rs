//! Identity extractors reading the resolved authentication result.
//!
//! Resolution itself happens in the middleware chain; these extractors
//! only surface it to handlers with a typed rejection. Absence of the
//! identity is the sole signal for "unauthenticated".

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gatehouse_core::error::AppError;
use gatehouse_entity::auth::AuthenticationResult;
use gatehouse_entity::session::Session;

/// The authenticated session behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

impl std::ops::Deref for CurrentUser {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authenticated_session(parts)
            .map(CurrentUser)
            .ok_or_else(|| AppError::authentication("Authentication required"))
    }
}

/// The authenticated session, additionally required to be an admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Session);

impl std::ops::Deref for AdminUser {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = authenticated_session(parts)
            .ok_or_else(|| AppError::authentication("Authentication required"))?;

        if !session.is_admin {
            return Err(AppError::authorization("Administrator privileges required"));
        }

        Ok(AdminUser(session))
    }
}

fn authenticated_session(parts: &Parts) -> Option<Session> {
    parts
        .extensions
        .get::<AuthenticationResult>()
        .filter(|result| result.is_authenticated())
        .and_then(|result| result.session.clone())
}
