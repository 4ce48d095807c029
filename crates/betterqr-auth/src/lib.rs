//! # betterqr-auth
//!
//! Session lifecycle and authentication for BetterQR.
//!
//! ## Modules
//!
//! - `session`: session store boundary, lifecycle manager, retention sweeper
//! - `password`: Argon2id password hashing and verification
//! - `captcha`: captcha token verification (reCAPTCHA)
//! - `login`: the credential check that ends in a new session

pub mod captcha;
pub mod login;
pub mod password;
pub mod session;

pub use captcha::{CaptchaVerifier, RecaptchaVerifier};
pub use login::{LoginAttempt, LoginOutcome, LoginService};
pub use password::PasswordHasher;
pub use session::{
    InvalidReason, MemorySessionStore, PgSessionStore, RetentionSweeper, RevokeResult,
    SessionManager, SessionStore, ValidationResult,
};
