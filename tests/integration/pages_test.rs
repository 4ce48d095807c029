//! Integration tests for public pages and the status endpoint.

use axum::http::{StatusCode, header};
use serde_json::json;
use uuid::Uuid;

use betterqr_core::config::AppConfig;

use super::helpers::{StubCaptcha, TestApp};

#[tokio::test]
async fn test_index_and_login_pages() {
    let app = TestApp::new().await;
    assert_eq!(app.get("/", None).await.status, StatusCode::OK);

    let login = app.get("/login", None).await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(!login.text.contains("class=\"notice\""));
}

#[tokio::test]
async fn test_users_status() {
    let app = TestApp::new().await;
    let response = app.get("/api/users/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"ok": true, "status": "betterqr.app api"})
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new().await;
    let response = app.get("/definitely/not/here", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text, "The page you are looking for does not exist.");
}

#[tokio::test]
async fn test_sitemap_served_as_xml() {
    let path = std::env::temp_dir().join(format!("betterqr-sitemap-{}.xml", Uuid::new_v4()));
    let xml = "<?xml version=\"1.0\"?><urlset></urlset>";
    std::fs::write(&path, xml).unwrap();

    let mut config = AppConfig::default();
    config.server.sitemap_path = path.to_string_lossy().into_owned();
    let app = TestApp::with_config(config, StubCaptcha::Accept).await;

    let response = app.get("/sitemap.xml", None).await;
    std::fs::remove_file(&path).ok();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );
    assert_eq!(response.text, xml);
}

#[tokio::test]
async fn test_missing_sitemap_is_not_found() {
    let mut config = AppConfig::default();
    config.server.sitemap_path = "/nonexistent/betterqr/sitemap.xml".to_string();
    let app = TestApp::with_config(config, StubCaptcha::Accept).await;

    assert_eq!(app.get("/sitemap.xml", None).await.status, StatusCode::NOT_FOUND);
}
