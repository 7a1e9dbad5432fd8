//! Shared test helpers for integration tests.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use gatehouse_api::{AppState, build_app, build_state};
use gatehouse_core::config::AppConfig;
use gatehouse_database::{Repositories, password};
use gatehouse_entity::user::User;

/// Password assigned to every user created through [`TestApp::create_test_user`].
pub const TEST_PASSWORD: &str = "password123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state for direct repository access
    pub state: AppState,
}

/// Decoded response from a test request
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application backed by in-memory repositories.
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = "memory".to_string();
        config.session.cookie_secure = false;

        let state = build_state(config, Repositories::memory());
        let router = build_app(state.clone());

        Self { router, state }
    }

    /// Insert a user whose password is [`TEST_PASSWORD`].
    pub async fn create_test_user(&self, username: &str, is_admin: bool) -> User {
        self.insert_user(username, is_admin, true).await
    }

    /// Insert a deactivated user whose password is [`TEST_PASSWORD`].
    pub async fn create_inactive_user(&self, username: &str) -> User {
        self.insert_user(username, false, false).await
    }

    async fn insert_user(&self, username: &str, is_admin: bool, is_active: bool) -> User {
        let user = User {
            id: uuid::Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: password::hash_password(TEST_PASSWORD).unwrap(),
            is_admin,
            is_active,
            created_at: chrono::Utc::now(),
        };
        self.state.repos.users.ensure_user(&user).await.unwrap();
        user
    }

    /// Log in through the HTTP endpoint and return the session cookie
    /// as a `name=value` pair for subsequent requests.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .request(
                "POST",
                "/admin/api/auth/login",
                Some(serde_json::json!({
                    "username": username,
                    "password": TEST_PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "login failed: {:?}",
            response.body
        );
        session_cookie(&response.headers).expect("login response carries no session cookie")
    }

    /// Issue a request and decode the response body as JSON.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        into_test_response(response).await
    }

    /// Issue a request authenticated with a bearer token.
    pub async fn bearer_request(&self, method: &str, path: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        into_test_response(response).await
    }
}

async fn into_test_response(response: axum::response::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Extract the session cookie from response headers as a `name=value` pair.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(|pair| pair.trim().to_string())
}

/// Assert that a response carries the full set of cache prevention headers.
pub fn assert_cache_prevention(headers: &HeaderMap) {
    assert_eq!(
        headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("private, no-cache, no-store, must-revalidate")
    );
    assert_eq!(
        headers.get(header::PRAGMA).and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
    assert_eq!(
        headers.get(header::EXPIRES).and_then(|v| v.to_str().ok()),
        Some("0")
    );
}
