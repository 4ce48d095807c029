//! Credential login: form checks, captcha, password, then a new session.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use betterqr_core::error::{AppError, FieldErrors};
use betterqr_core::logging::MAIN;
use betterqr_core::result::AppResult;
use betterqr_entity::session::Session;
use betterqr_entity::user::UserIdentity;

use crate::captcha::CaptchaVerifier;
use crate::password::PasswordHasher;
use crate::session::SessionManager;

const REQUIRED: &str = "This field is required.";
const INVALID_EMAIL: &str = "Invalid email address.";
const CAPTCHA_FAILED: &str = "Recaptcha verification failed. Please try again.";
const USER_NOT_FOUND: &str = "User not found.";
const WRONG_PASSWORD: &str = "Incorrect password.";

/// One login submission plus where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoginAttempt {
    pub email: String,
    pub password: String,
    pub captcha_token: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated account.
    pub user: UserIdentity,
    /// The session issued for this login.
    pub session: Session,
}

#[derive(Debug, Validate)]
struct LoginCredentials {
    #[validate(custom(function = "required"), email(message = "Invalid email address."))]
    email: String,
    #[validate(custom(function = "required"))]
    password: String,
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED)));
    }
    Ok(())
}

/// Reduces validator output to one message per field, preferring the
/// "required" failure over format failures.
fn first_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let chosen = errs
                .iter()
                .find(|e| e.code == "required")
                .or_else(|| errs.first())?;
            let message = chosen
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| match chosen.code.as_ref() {
                    "email" => INVALID_EMAIL.to_string(),
                    _ => REQUIRED.to_string(),
                });
            Some((field.to_string(), vec![message]))
        })
        .collect()
}

/// Runs the login flow against the session store.
#[derive(Debug, Clone)]
pub struct LoginService {
    sessions: SessionManager,
    captcha: Arc<dyn CaptchaVerifier>,
    hasher: PasswordHasher,
}

impl LoginService {
    /// Creates a login service.
    pub fn new(sessions: SessionManager, captcha: Arc<dyn CaptchaVerifier>) -> Self {
        Self {
            sessions,
            captcha,
            hasher: PasswordHasher::new(),
        }
    }

    /// Authenticates `attempt` and issues a session.
    ///
    /// Failures, in the order they are checked:
    /// 1. validation error with per-field messages
    /// 2. captcha rejection
    /// 3. unknown email
    /// 4. wrong password
    pub async fn login(&self, attempt: LoginAttempt) -> AppResult<LoginOutcome> {
        let credentials = LoginCredentials {
            email: attempt.email.trim().to_string(),
            password: attempt.password.clone(),
        };
        if let Err(errors) = credentials.validate() {
            return Err(AppError::validation("Invalid login form").with_fields(first_errors(&errors)));
        }

        let accepted = self
            .captcha
            .verify(&attempt.captcha_token, attempt.client_ip.as_deref())
            .await?;
        if !accepted {
            return Err(AppError::captcha(CAPTCHA_FAILED).on_field("recaptcha"));
        }

        let Some(user) = self
            .sessions
            .store()
            .find_user_by_email(&credentials.email)
            .await?
        else {
            info!(target: MAIN, "Login for unknown email");
            return Err(AppError::not_found(USER_NOT_FOUND).on_field("email"));
        };

        if !self
            .hasher
            .verify_password(&attempt.password, &user.security.password)?
        {
            warn!(target: MAIN, user = %user.uuid, "Login with incorrect password");
            return Err(AppError::authentication(WRONG_PASSWORD).on_field("password"));
        }

        let identity = user.identity();
        let session = self
            .sessions
            .create(&identity, attempt.client_ip, attempt.user_agent)
            .await?;

        info!(target: MAIN, user = %identity.uuid, "User logged in");
        Ok(LoginOutcome {
            user: identity,
            session,
        })
    }
}
