//! Unified application error types for BetterQR.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Errors that concern a particular form
//! field carry per-field messages so the HTTP layer can render them as
//! `{"errors": {"field": ["message", ...]}}`.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input failed shape validation (missing fields, malformed email).
    Validation,
    /// The captcha token was rejected by the verification service.
    Captcha,
    /// The requested user or session was not found.
    NotFound,
    /// Authentication failed (wrong password).
    Authentication,
    /// An internal server error occurred.
    Internal,
    /// The store is unreachable or returned malformed data.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An external service could not be reached.
    ExternalService,
}

impl ErrorKind {
    /// The form key used when an error carries no explicit field messages.
    pub fn default_field(&self) -> &'static str {
        match self {
            Self::Validation => "form",
            Self::Captcha => "recaptcha",
            Self::NotFound => "email",
            Self::Authentication => "password",
            Self::Internal
            | Self::Database
            | Self::Configuration
            | Self::Serialization
            | Self::ExternalService => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Captcha => write!(f, "CAPTCHA"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
        }
    }
}

/// Per-field error messages, keyed by form field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The unified application error used throughout BetterQR.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Messages attached to specific form fields.
    pub errors: FieldErrors,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: FieldErrors::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: FieldErrors::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Attach the error message to a single form field.
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(self.message.clone());
        self
    }

    /// Replace the per-field messages.
    pub fn with_fields(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    /// Per-field messages, falling back to the kind's default field when
    /// none were attached.
    pub fn field_errors(&self) -> FieldErrors {
        if !self.errors.is_empty() {
            return self.errors.clone();
        }
        let mut errors = FieldErrors::new();
        errors.insert(
            self.kind.default_field().to_string(),
            vec![self.message.clone()],
        );
        errors
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a captcha rejection error.
    pub fn captcha(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Captcha, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
