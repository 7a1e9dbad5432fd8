//! Non-enforcing identity extraction middleware.
//!
//! Resolves credentials (cookie first, bearer second) and attaches the
//! typed [`AuthenticationResult`] to the request extensions. Never
//! blocks a request: without a usable credential the downstream layers
//! simply see an anonymous result. Placed ahead of traffic capture so
//! metrics can attribute identity even on public routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use gatehouse_entity::client::ClientInfo;

use crate::state::AppState;

/// Attaches the resolved [`AuthenticationResult`] to the request.
pub async fn extract_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ClientInfo>()
        .cloned()
        .unwrap_or_default();

    let result = state.auth_resolver.resolve(request.headers(), &client).await;
    request.extensions_mut().insert(result);

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::body::Body;
    use axum::extract::Extension;
    use axum::http::header::COOKIE;
    use axum::routing::get;
    use tower::ServiceExt;

    use gatehouse_auth::session::cookie::SESSION_COOKIE;
    use gatehouse_entity::auth::AuthenticationResult;

    async fn describe(Extension(result): Extension<AuthenticationResult>) -> String {
        format!("{}:{}", result.method, result.is_authenticated())
    }

    fn test_router_state() -> (Router, crate::state::AppState) {
        let state = crate::app::test_support::memory_state();
        let router = Router::new()
            .route("/probe", get(describe))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                extract_identity,
            ))
            .with_state(state.clone());
        (router, state)
    }

    #[tokio::test]
    async fn test_no_credential_yields_anonymous_result() {
        let (app, _state) = test_router_state();
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"none:false");
    }

    #[tokio::test]
    async fn test_valid_cookie_yields_cookie_identity() {
        let (app, state) = test_router_state();
        let user = crate::app::test_support::seed_user(&state, "carol", false).await;
        let session = state
            .session_store
            .new_session(&user, "local", "test", Default::default())
            .await
            .unwrap();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .header(COOKIE, format!("{SESSION_COOKIE}={}", session.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"cookie:true");
    }
}
