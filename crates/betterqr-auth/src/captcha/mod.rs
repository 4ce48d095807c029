//! Captcha token verification.

pub mod recaptcha;

use async_trait::async_trait;

use betterqr_core::result::AppResult;

pub use recaptcha::RecaptchaVerifier;

/// Verifies a client-supplied captcha token.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync + std::fmt::Debug {
    /// Returns `Ok(false)` when the token is rejected and an error when the
    /// verification service cannot be reached.
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> AppResult<bool>;
}
