//! Integration tests for route protection: redirects for pages,
//! status codes for API calls, and cache prevention headers.

mod helpers;

use axum::http::{StatusCode, header};

use helpers::{TestApp, assert_cache_prevention};

fn location(response: &helpers::TestResponse) -> &str {
    response
        .headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_anonymous_page_request_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/admin/sessions", None, None).await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(location(&response), "/admin/login?redirect=%2Fadmin%2Fsessions");
    assert_cache_prevention(&response.headers);
}

#[tokio::test]
async fn test_redirect_preserves_query_string() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/admin/sessions?filter=active", None, None)
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "/admin/login?redirect=%2Fadmin%2Fsessions%3Ffilter%3Dactive"
    );
}

#[tokio::test]
async fn test_anonymous_api_request_gets_401() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/admin/api/admin/stats", None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
    assert_cache_prevention(&response.headers);
}

#[tokio::test]
async fn test_non_admin_api_request_gets_403_and_keeps_session() {
    let app = TestApp::new().await;
    app.create_test_user("alice", false).await;
    let cookie = app.login("alice").await;

    let response = app
        .request("GET", "/admin/api/admin/stats", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");

    // The denied call must not cost the user their session.
    let me = app
        .request("GET", "/admin/api/auth/me", None, Some(&cookie))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "alice");
}

#[tokio::test]
async fn test_non_admin_page_request_force_ends_session() {
    let app = TestApp::new().await;
    app.create_test_user("alice", false).await;
    let cookie = app.login("alice").await;

    let response = app
        .request("GET", "/admin/sessions", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(location(&response), "/admin/login?redirect=%2Fadmin%2Fsessions");

    // The session was closed server side, not just redirected away.
    let me = app
        .request("GET", "/admin/api/auth/me", None, Some(&cookie))
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_reaches_pages_and_api() {
    let app = TestApp::new().await;
    app.create_test_user("root", true).await;
    let cookie = app.login("root").await;

    let page = app
        .request("GET", "/admin/sessions", None, Some(&cookie))
        .await;
    assert_eq!(page.status, StatusCode::OK);

    let api = app
        .request("GET", "/admin/api/admin/stats", None, Some(&cookie))
        .await;
    assert_eq!(api.status, StatusCode::OK);
    assert_eq!(api.body["success"], true);
}

#[tokio::test]
async fn test_pass_through_responses_carry_cache_prevention() {
    let app = TestApp::new().await;
    app.create_test_user("root", true).await;
    let cookie = app.login("root").await;

    let response = app
        .request("GET", "/admin/api/admin/stats", None, Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_cache_prevention(&response.headers);
}

#[tokio::test]
async fn test_login_page_stays_reachable() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/admin/login", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_needs_no_credentials() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_admin_can_end_another_users_session() {
    let app = TestApp::new().await;
    app.create_test_user("root", true).await;
    app.create_test_user("alice", false).await;

    let admin_cookie = app.login("root").await;
    let alice_cookie = app.login("alice").await;
    let alice_token = alice_cookie
        .strip_prefix("gatehouse_session=")
        .unwrap()
        .to_string();

    let response = app
        .request(
            "DELETE",
            &format!("/admin/api/admin/sessions/{}", alice_token),
            None,
            Some(&admin_cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let me = app
        .request("GET", "/admin/api/auth/me", None, Some(&alice_cookie))
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ending_unknown_session_is_404() {
    let app = TestApp::new().await;
    app.create_test_user("root", true).await;
    let cookie = app.login("root").await;

    let response = app
        .request(
            "DELETE",
            "/admin/api/admin/sessions/no-such-token",
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ending_session_twice_is_conflict() {
    let app = TestApp::new().await;
    app.create_test_user("root", true).await;
    app.create_test_user("alice", false).await;

    let admin_cookie = app.login("root").await;
    let alice_cookie = app.login("alice").await;
    let alice_token = alice_cookie
        .strip_prefix("gatehouse_session=")
        .unwrap()
        .to_string();
    let path = format!("/admin/api/admin/sessions/{}", alice_token);

    let first = app
        .request("DELETE", &path, None, Some(&admin_cookie))
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request("DELETE", &path, None, Some(&admin_cookie))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_session_listing() {
    let app = TestApp::new().await;
    app.create_test_user("root", true).await;
    app.create_test_user("alice", false).await;

    let admin_cookie = app.login("root").await;
    app.login("alice").await;

    let response = app
        .request("GET", "/admin/api/admin/sessions", None, Some(&admin_cookie))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let sessions = response.body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s["token"].as_str().is_some()));
}
