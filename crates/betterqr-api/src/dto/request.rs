//! Request DTOs.

use serde::Deserialize;

/// Body of `POST /api/forms/login` (form-encoded). Missing fields arrive
/// empty and are reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// reCAPTCHA response token.
    #[serde(rename = "g-recaptcha-response")]
    pub captcha_token: String,
}
