//! Integration tests for the session gate and protected routes.

use axum::http::StatusCode;
use chrono::Duration;

use super::helpers::TestApp;

const NOT_LOGGED_IN: &str = "/login?utm_source=internal&utm_medium=redirect&utm_campaign=login_redirect&utm_content=not_logged_in";
const SESSION_EXPIRED: &str = "/login?utm_source=internal&utm_medium=redirect&utm_campaign=login_redirect&utm_content=session_expired";

#[tokio::test]
async fn test_protected_route_requires_login() {
    let app = TestApp::new().await;
    let response = app.get("/app/", None).await;

    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some(NOT_LOGGED_IN));
}

#[tokio::test]
async fn test_protected_route_with_session() {
    let app = TestApp::new().await;
    let cookies = app.login().await;

    let response = app.get("/app/", Some(&cookies)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "Welcome to the app!");
}

#[tokio::test]
async fn test_session_granted_at_29_days() {
    let app = TestApp::new().await;
    let cookies = app.login().await;
    app.age_sessions(Duration::days(29)).await;

    let response = app.get("/app/", Some(&cookies)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_denied_at_31_days() {
    let app = TestApp::new().await;
    let cookies = app.login().await;
    app.age_sessions(Duration::days(31)).await;

    let response = app.get("/app/", Some(&cookies)).await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some(SESSION_EXPIRED));
    assert!(response.removes_cookie("sid"));
    assert!(app.user().await.sessions.is_empty());

    let notice = response.cookie_header();
    assert!(notice.starts_with("notice="));
    let page = app.get("/login", Some(&notice)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(
        page.text
            .contains("Your session has expired, please log in again.")
    );
    assert!(page.removes_cookie("notice"));
}

#[tokio::test]
async fn test_gate_applies_to_public_routes() {
    let app = TestApp::new().await;
    let cookies = app.login().await;
    app.age_sessions(Duration::days(31)).await;

    let response = app.get("/", Some(&cookies)).await;
    assert_eq!(response.location(), Some(SESSION_EXPIRED));
}

#[tokio::test]
async fn test_tampered_cookie_is_ignored() {
    let app = TestApp::new().await;
    let response = app.get("/app/", Some("sid=not-a-valid-ciphertext")).await;

    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some(NOT_LOGGED_IN));
}
