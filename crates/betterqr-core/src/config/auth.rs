//! Authentication configuration: cookie encryption and captcha verification.

use serde::{Deserialize, Serialize};

/// Minimum length of the cookie encryption secret, in bytes.
pub const MIN_COOKIE_SECRET_LEN: usize = 64;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to derive the cookie encryption key. At least 64 bytes.
    #[serde(default = "default_cookie_secret")]
    pub cookie_secret: String,
    /// Whether the session cookie carries the `Secure` attribute.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// Captcha verification settings.
    #[serde(default)]
    pub captcha: CaptchaConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_secret: default_cookie_secret(),
            cookie_secure: true,
            captcha: CaptchaConfig::default(),
        }
    }
}

/// reCAPTCHA verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaConfig {
    /// Server-side secret sent with every verification request.
    #[serde(default)]
    pub secret_key: String,
    /// Verification endpoint.
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            verify_url: default_verify_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_cookie_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_CHANGE_ME_IN_PRODUCTION_CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
