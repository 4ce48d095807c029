//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use betterqr_core::error::{AppError, ErrorKind, FieldErrors};
use betterqr_core::logging::MAIN;

/// Body of every failed JSON request: `{"ok": false, "errors": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub ok: bool,
    /// Messages keyed by form field.
    pub errors: FieldErrors,
}

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Captcha => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::ExternalService => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let errors = if status.is_server_error() {
            error!(target: MAIN, kind = %err.kind, error = %err.message, "Request failed");
            let message = match err.kind {
                ErrorKind::Database => "Database error.",
                _ => "Internal server error.",
            };
            FieldErrors::from([("internal".to_string(), vec![message.to_string()])])
        } else {
            err.field_errors()
        };

        (status, Json(ApiErrorResponse { ok: false, errors })).into_response()
    }
}
