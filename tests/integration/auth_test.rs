//! Integration tests for login and logout.

use axum::http::StatusCode;
use serde_json::json;

use super::helpers::{EMAIL, PASSWORD, StubCaptcha, TestApp};

#[tokio::test]
async fn test_login_success_sets_session_cookie() {
    let app = TestApp::new().await;
    let response = app.submit_login(EMAIL, PASSWORD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"ok": true, "message": "Logged in successfully."})
    );

    let cookie = response.set_cookie("sid").expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));

    let user = app.user().await;
    assert_eq!(user.sessions.len(), 1);
    let session = &user.sessions[0];
    assert_eq!(session.ip.as_deref(), Some("203.0.113.7"));
    assert_eq!(session.user_agent.as_deref(), Some("integration-test"));
    assert!(!cookie.contains(&session.sid), "sid must not travel in clear text");
}

#[tokio::test]
async fn test_login_form_posted_to_login_page() {
    let app = TestApp::new().await;
    let response = app
        .post_form(
            "/login",
            &[
                ("email", EMAIL),
                ("password", PASSWORD),
                ("g-recaptcha-response", "token"),
            ],
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"ok": true, "message": "Logged in successfully."})
    );
    assert!(response.set_cookie("sid").is_some());
    assert_eq!(app.user().await.sessions.len(), 1);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = TestApp::new().await;
    let response = app.post_form("/api/forms/login", &[], &[]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({
            "ok": false,
            "errors": {
                "email": ["This field is required."],
                "password": ["This field is required."]
            }
        })
    );
}

#[tokio::test]
async fn test_login_invalid_email() {
    let app = TestApp::new().await;
    let response = app.submit_login("not-an-email", PASSWORD).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["errors"]["email"],
        json!(["Invalid email address."])
    );
}

#[tokio::test]
async fn test_login_captcha_rejected() {
    let app = TestApp::with_captcha(StubCaptcha::Reject).await;
    let response = app.submit_login(EMAIL, PASSWORD).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["errors"],
        json!({"recaptcha": ["Recaptcha verification failed. Please try again."]})
    );
    assert!(response.set_cookie("sid").is_none());
}

#[tokio::test]
async fn test_login_captcha_unreachable() {
    let app = TestApp::with_captcha(StubCaptcha::Unreachable).await;
    let response = app.submit_login(EMAIL, PASSWORD).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["ok"], json!(false));
    assert!(response.json()["errors"]["internal"].is_array());
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new().await;
    let response = app.submit_login("nobody@example.com", PASSWORD).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({"ok": false, "errors": {"email": ["User not found."]}})
    );
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    let response = app.submit_login(EMAIL, "wrong").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        json!({"ok": false, "errors": {"password": ["Incorrect password."]}})
    );
    assert!(app.user().await.sessions.is_empty());
}

#[tokio::test]
async fn test_logout_without_session_redirects_home() {
    let app = TestApp::new().await;
    let response = app.get("/logout", None).await;

    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::new().await;
    let cookies = app.login().await;
    let sid = app.user().await.sessions[0].sid.clone();

    let response = app.get("/logout", Some(&cookies)).await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some("/"));
    assert!(response.removes_cookie("sid"));

    let user = app.user().await;
    assert!(user.sessions.is_empty());
    assert_eq!(user.logged_out_sessions.len(), 1);
    assert_eq!(user.logged_out_sessions[0].sid, sid);
    assert!(app.store.has_retention_index().await);
}

#[tokio::test]
async fn test_revoked_cookie_is_rejected() {
    let app = TestApp::new().await;
    let cookies = app.login().await;
    app.get("/logout", Some(&cookies)).await;

    let response = app.get("/app/", Some(&cookies)).await;
    assert!(response.status.is_redirection());
    assert!(
        response
            .location()
            .is_some_and(|l| l.ends_with("utm_content=session_expired"))
    );
    assert!(response.removes_cookie("sid"));
}

#[tokio::test]
async fn test_two_logins_keep_both_sessions() {
    let app = TestApp::new().await;
    let first = app.login().await;
    let second = app.login().await;

    assert_eq!(app.user().await.sessions.len(), 2);
    assert_eq!(app.get("/app/", Some(&first)).await.status, StatusCode::OK);
    assert_eq!(app.get("/app/", Some(&second)).await.status, StatusCode::OK);
}
