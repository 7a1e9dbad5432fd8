//! Route table and middleware chain assembly.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Outermost to innermost the chain runs: client context, identity
/// extraction, CORS, tracing, compression, traffic capture, body
/// limit, then the per-route enforcement layers and handlers. Capture
/// sits inside compression so error excerpts see readable bodies.
pub fn build_router(state: AppState) -> Router {
    let prefix = state.config.server.management_mount();
    let max_body = state.config.server.max_body_bytes;
    let cors = build_cors_layer(&state.config.server);

    let api_routes = Router::new()
        .merge(auth_routes(&state))
        .merge(token_routes(&state))
        .merge(admin_routes(&state));

    Router::new()
        .nest(&format!("{prefix}/api"), api_routes)
        .merge(ui_routes(&state, &prefix))
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::traffic::capture_traffic,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::identity::extract_identity,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::client_context::attach_client_info,
        ))
        .with_state(state)
}

/// Auth endpoints: login, logout, me.
///
/// Login and logout stay unenforced; logout is idempotent and must
/// work for a cookie that no longer resolves.
fn auth_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_user_api,
        ));

    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .merge(protected)
}

/// API token endpoints, all bound to the calling identity.
fn token_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/tokens",
            post(handlers::token::create_token).get(handlers::token::list_tokens),
        )
        .route("/tokens/{id}", delete(handlers::token::revoke_token))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_user_api,
        ))
}

/// Admin API endpoints.
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/sessions", get(handlers::admin::sessions::list_sessions))
        .route(
            "/admin/sessions/{token}",
            delete(handlers::admin::sessions::end_session),
        )
        .route("/admin/traffic", get(handlers::admin::traffic::recent_traffic))
        .route("/admin/stats", get(handlers::admin::traffic::stats))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin_api,
        ))
}

/// Management UI pages. Everything except the login page requires an
/// admin identity and redirects to login otherwise.
fn ui_routes(state: &AppState, prefix: &str) -> Router<AppState> {
    let pages = Router::new()
        .route(prefix, get(handlers::ui::dashboard))
        .route(
            &format!("{prefix}/sessions"),
            get(handlers::ui::sessions_page),
        )
        .route(&format!("{prefix}/tokens"), get(handlers::ui::tokens_page))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin_static,
        ));

    Router::new()
        .route(&format!("{prefix}/login"), get(handlers::ui::login_page))
        .merge(pages)
}

/// Health check endpoint (no auth, excluded from metrics).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::app::test_support::memory_state;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = build_router(memory_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_page_is_public() {
        let app = build_router(memory_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_page_requires_login() {
        let app = build_router(memory_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/admin/login?redirect=%2Fadmin%2Fsessions")
        );
    }

    #[tokio::test]
    async fn test_admin_api_requires_credentials() {
        let app = build_router(memory_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/api/admin/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = build_router(memory_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
