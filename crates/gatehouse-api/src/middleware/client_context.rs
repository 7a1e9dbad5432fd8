//! Client context middleware.
//!
//! Runs first in the chain: derives [`ClientInfo`] (IP, user agent
//! breakdown, geo, fingerprint) for every request and stores it in the
//! request extensions for the layers and handlers below.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use gatehouse_entity::client::ClientInfo;

use crate::state::AppState;

/// Attaches [`ClientInfo`] to the request extensions.
pub async fn attach_client_info(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let socket_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_default();

    let client = state
        .client_extractor
        .extract(
            request.headers(),
            request.method(),
            request.version(),
            &socket_ip,
        )
        .await;

    request.extensions_mut().insert(client);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::body::Body;
    use axum::extract::Extension;
    use axum::routing::get;
    use std::sync::Arc;
    use tower::ServiceExt;

    use gatehouse_auth::client::{ClientInfoExtractor, NoGeoResolver};
    use gatehouse_auth::FingerprintCache;
    use gatehouse_core::config::CacheConfig;

    async fn echo_ip(Extension(client): Extension<ClientInfo>) -> String {
        client.ip_address
    }

    fn test_router() -> Router {
        let state = crate::app::test_support::memory_state();
        Router::new()
            .route("/probe", get(echo_ip))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                attach_client_info,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_client_info_is_attached() {
        let app = test_router();
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"203.0.113.9");
    }

    #[tokio::test]
    async fn test_extractor_standalone_fingerprints_stably() {
        let cache = Arc::new(FingerprintCache::new(&CacheConfig::default()));
        let extractor = ClientInfoExtractor::new(cache, Arc::new(NoGeoResolver));

        let headers = axum::http::HeaderMap::new();
        let first = extractor
            .extract(
                &headers,
                &axum::http::Method::GET,
                axum::http::Version::HTTP_11,
                "192.0.2.1",
            )
            .await;
        let second = extractor
            .extract(
                &headers,
                &axum::http::Method::GET,
                axum::http::Version::HTTP_11,
                "192.0.2.1",
            )
            .await;
        assert_eq!(first.fingerprint, second.fingerprint);
    }
}
