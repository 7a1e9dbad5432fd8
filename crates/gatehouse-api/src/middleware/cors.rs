//! CORS layer construction.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use gatehouse_core::config::ServerConfig;

/// Build the CORS layer from configuration.
///
/// An empty origin list, or one containing `"*"`, allows any origin.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new().allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]);

    let origins = &config.cors_allowed_origins;
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_origin(Any).allow_headers(Any);
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors = cors
            .allow_origin(parsed)
            .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::AUTHORIZATION])
            .allow_credentials(true);
    }

    cors
}
