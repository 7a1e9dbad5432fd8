//! Auth handlers: login, logout, me.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use validator::Validate;

use gatehouse_auth::session::cookie;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_entity::auth::AuthenticationResult;
use gatehouse_entity::client::ClientInfo;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, MeResponse, SessionResponse};
use crate::state::AppState;

/// POST {prefix}/api/auth/login
///
/// Verifies credentials against the user directory and opens a session.
/// The response sets the session cookie; bad credentials always read
/// the same from outside.
pub async fn login(
    State(state): State<AppState>,
    Extension(client): Extension<ClientInfo>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|error| AppError::validation(error.to_string()))?;

    let user = state
        .repos
        .users
        .verify_credentials(&request.username, &request.password)
        .await?
        .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

    let session = state
        .session_store
        .new_session(&user, "local", "web", client)
        .await?;

    let cookie_value = cookie::build_session_cookie(
        &session.token,
        state.config.session.ttl_seconds(),
        state.config.session.cookie_secure,
    )
    .map_err(|error| AppError::internal(format!("Failed to build session cookie: {error}")))?;

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    let body = Json(ApiResponse::ok(SessionResponse::from(&session)));
    Ok(([(header::SET_COOKIE, cookie_value)], body))
}

/// POST {prefix}/api/auth/logout
///
/// Closes the cookie session and clears the cookie. Idempotent at the
/// HTTP layer: an already-closed or unknown session still yields 204,
/// only infrastructure failures surface.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = cookie::session_token(&headers) {
        match state.session_store.end_session(&token).await {
            Ok(()) => tracing::info!("Session closed on logout"),
            Err(error) if matches!(error.kind, ErrorKind::NotFound | ErrorKind::Conflict) => {
                tracing::debug!(error = %error, "Logout on a session that is already gone");
            }
            Err(error) => return Err(error),
        }
    }

    let cleared = cookie::clear_session_cookie(state.config.session.cookie_secure)
        .map_err(|error| AppError::internal(format!("Failed to build session cookie: {error}")))?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cleared)]))
}

/// GET {prefix}/api/auth/me
pub async fn me(
    Extension(identity): Extension<AuthenticationResult>,
) -> Result<Json<ApiResponse<MeResponse>>, AppError> {
    let session = identity
        .session
        .as_ref()
        .filter(|session| session.is_authenticated)
        .ok_or_else(|| AppError::authentication("Authentication required"))?;

    Ok(Json(ApiResponse::ok(MeResponse {
        user_id: session.user_id,
        username: session.username.clone(),
        email: session.email.clone(),
        is_admin: session.is_admin,
        auth_method: identity.method.to_string(),
        valid_until: session.valid_until,
    })))
}
