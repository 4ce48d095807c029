//! Google reCAPTCHA `siteverify` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use betterqr_core::config::auth::CaptchaConfig;
use betterqr_core::error::{AppError, ErrorKind};
use betterqr_core::logging::MAIN;
use betterqr_core::result::AppResult;

use super::CaptchaVerifier;

/// Body returned by the `siteverify` endpoint.
#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifies tokens against the reCAPTCHA `siteverify` endpoint.
#[derive(Debug, Clone)]
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret_key: String,
    verify_url: String,
}

impl RecaptchaVerifier {
    /// Builds a verifier with its own HTTP client.
    pub fn new(config: &CaptchaConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build captcha HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            secret_key: config.secret_key.clone(),
            verify_url: config.verify_url.clone(),
        })
    }

    fn form<'a>(&'a self, token: &'a str, remote_ip: Option<&'a str>) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![("secret", self.secret_key.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }
        form
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> AppResult<bool> {
        let response = self
            .client
            .post(&self.verify_url)
            .form(&self.form(token, remote_ip))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Captcha verification service unreachable",
                    e,
                )
            })?;

        let body: SiteVerifyResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Captcha verification returned an unreadable response",
                e,
            )
        })?;

        if body.success {
            debug!(target: MAIN, "Captcha token accepted");
        } else {
            warn!(target: MAIN, error_codes = ?body.error_codes, "Captcha token rejected");
        }
        Ok(body.success)
    }
}
