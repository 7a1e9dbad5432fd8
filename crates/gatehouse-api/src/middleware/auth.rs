//! Enforcing authentication middleware.
//!
//! Applied per route group via `route_layer`, parameterized by the
//! route class: whether admin privileges are required and whether the
//! route serves browser-facing pages (static class) or the API.
//!
//! Every response leaving this layer, pass-through included, carries
//! cache-prevention headers so personalized content is never cached by
//! intermediaries.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use url::form_urlencoded;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_entity::auth::{AuthMethod, AuthenticationResult};

use crate::state::AppState;

/// Route classification for the enforcement decision matrix.
#[derive(Debug, Clone, Copy)]
pub struct RoutePolicy {
    /// Whether the route requires admin privileges.
    pub admin_required: bool,
    /// Whether the route serves browser-facing pages.
    pub is_static: bool,
}

/// Requires any authenticated identity on an API route.
pub async fn require_user_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(
        state,
        request,
        next,
        RoutePolicy {
            admin_required: false,
            is_static: false,
        },
    )
    .await
}

/// Requires an admin identity on an API route.
pub async fn require_admin_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(
        state,
        request,
        next,
        RoutePolicy {
            admin_required: true,
            is_static: false,
        },
    )
    .await
}

/// Requires an admin identity on a browser-facing route.
pub async fn require_admin_static(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(
        state,
        request,
        next,
        RoutePolicy {
            admin_required: true,
            is_static: true,
        },
    )
    .await
}

/// The enforcement decision matrix.
///
/// Unauthenticated requests are redirected to the login page (static
/// class) or rejected with 401 (API). An authenticated but under-
/// privileged identity gets 403 on the API with its session intact; on
/// a static route the session is force-ended first so a stale elevated
/// cookie cannot keep probing, then the browser is sent to login.
async fn enforce(state: AppState, request: Request, next: Next, policy: RoutePolicy) -> Response {
    let identity = request
        .extensions()
        .get::<AuthenticationResult>()
        .cloned()
        .unwrap_or_else(AuthenticationResult::anonymous);

    if !identity.is_authenticated() {
        let response = if policy.is_static {
            login_redirect(&state, &request)
        } else {
            AppError::authentication("Authentication required").into_response()
        };
        return with_cache_prevention(response);
    }

    if policy.admin_required && !identity.is_admin() {
        if policy.is_static {
            force_logout(&state, &identity).await;
            return with_cache_prevention(login_redirect(&state, &request));
        }
        let response =
            AppError::authorization("Administrator privileges required").into_response();
        return with_cache_prevention(response);
    }

    with_cache_prevention(next.run(request).await)
}

/// Closes the session behind a cookie identity that failed a privilege
/// check. A concurrent close is benign here, unlike explicit logout.
async fn force_logout(state: &AppState, identity: &AuthenticationResult) {
    if identity.method != AuthMethod::Cookie {
        return;
    }
    let Some(session) = identity.session.as_ref() else {
        return;
    };

    match state.session_store.end_session(&session.token).await {
        Ok(()) => {
            tracing::info!(
                user_id = %session.user_id,
                "Forced logout after failed privilege check"
            );
        }
        Err(error) if matches!(error.kind, ErrorKind::NotFound | ErrorKind::Conflict) => {
            tracing::debug!(error = %error, "Session already gone during forced logout");
        }
        Err(error) => {
            tracing::warn!(error = %error, "Failed to force-end session");
        }
    }
}

/// 302 to the login page with the original path and query preserved.
fn login_redirect(state: &AppState, request: &Request) -> Response {
    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path());
    let encoded: String = form_urlencoded::byte_serialize(original.as_bytes()).collect();
    let location = format!(
        "{}/login?redirect={}",
        state.config.server.management_mount(),
        encoded
    );

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::FOUND;
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

/// Marks a response uncacheable by shared caches and intermediaries.
fn with_cache_prevention(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("private, no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}
