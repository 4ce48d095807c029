//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use betterqr_api::{AppState, build_app};
use betterqr_auth::{
    CaptchaVerifier, LoginService, MemorySessionStore, PasswordHasher, SessionManager,
};
use betterqr_core::config::AppConfig;
use betterqr_core::error::AppError;
use betterqr_core::result::AppResult;
use betterqr_entity::user::{Security, User};

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse battery staple";

/// Captcha double with a fixed verdict.
#[derive(Debug, Clone, Copy)]
pub enum StubCaptcha {
    Accept,
    Reject,
    Unreachable,
}

#[async_trait]
impl CaptchaVerifier for StubCaptcha {
    async fn verify(&self, token: &str, _remote_ip: Option<&str>) -> AppResult<bool> {
        match self {
            Self::Accept => Ok(!token.is_empty()),
            Self::Reject => Ok(false),
            Self::Unreachable => Err(AppError::external_service("captcha service down")),
        }
    }
}

/// Test application context.
pub struct TestApp {
    pub router: Router,
    pub store: MemorySessionStore,
    pub user: Uuid,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    /// Body parsed as JSON, or `Null`.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }

    /// The redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(String::from))
            .collect()
    }

    /// The `Set-Cookie` header for `name`.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }

    /// Whether the response deletes cookie `name`.
    pub fn removes_cookie(&self, name: &str) -> bool {
        self.set_cookie(name)
            .is_some_and(|c| c.contains("Max-Age=0"))
    }

    /// A `Cookie` request header replaying the cookies this response set.
    pub fn cookie_header(&self) -> String {
        self.set_cookies()
            .iter()
            .filter(|c| !c.contains("Max-Age=0"))
            .filter_map(|c| c.split(';').next())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl TestApp {
    /// App with one registered user and a captcha that accepts any token.
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default(), StubCaptcha::Accept).await
    }

    /// App with a specific captcha verdict.
    pub async fn with_captcha(captcha: StubCaptcha) -> Self {
        Self::with_config(AppConfig::default(), captcha).await
    }

    /// App with custom configuration.
    pub async fn with_config(config: AppConfig, captcha: StubCaptcha) -> Self {
        let store = MemorySessionStore::new();
        let user = Uuid::new_v4();
        store
            .insert_user(User {
                uuid: user,
                email: EMAIL.to_string(),
                name: Some("Ada".to_string()),
                security: Security {
                    password: PasswordHasher::new()
                        .hash_password(PASSWORD)
                        .expect("hash password"),
                },
                sessions: Vec::new(),
                logged_out_sessions: Vec::new(),
                created_at: Utc::now(),
            })
            .await;

        let manager = SessionManager::new(Arc::new(store.clone()), &config.session);
        let login = LoginService::new(manager.clone(), Arc::new(captcha));
        let state = AppState::new(config, manager, login).expect("build state");

        Self {
            router: build_app(state),
            store,
            user,
        }
    }

    /// Sends `request` through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// GET `path`, optionally replaying cookies.
    pub async fn get(&self, path: &str, cookies: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(cookies) = cookies {
            req = req.header(header::COOKIE, cookies);
        }
        self.send(req.body(Body::empty()).expect("build request")).await
    }

    /// POST a form-encoded body with extra headers.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        self.send(req.body(Body::from(body)).expect("build request")).await
    }

    /// Submits the login form.
    pub async fn submit_login(&self, email: &str, password: &str) -> TestResponse {
        self.post_form(
            "/api/forms/login",
            &[
                ("email", email),
                ("password", password),
                ("g-recaptcha-response", "token"),
            ],
            &[
                ("cf-connecting-ip", "203.0.113.7"),
                ("user-agent", "integration-test"),
            ],
        )
        .await
    }

    /// Logs in and returns the `Cookie` header carrying the session.
    pub async fn login(&self) -> String {
        let response = self.submit_login(EMAIL, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);
        response.cookie_header()
    }

    /// Snapshot of the registered user.
    pub async fn user(&self) -> User {
        self.store.user(self.user).await.expect("user exists")
    }

    /// Shifts every active session's `created_at` back to `age` ago.
    pub async fn age_sessions(&self, age: Duration) {
        let mut user = self.user().await;
        for session in &mut user.sessions {
            session.created_at = Utc::now() - age;
        }
        self.store.insert_user(user).await;
    }
}

fn form_encode(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '*' => c.to_string(),
            ' ' => "+".to_string(),
            c => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{b:02X}"))
                    .collect()
            }
        })
        .collect()
}
