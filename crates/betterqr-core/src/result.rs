//! Convenience result type alias for BetterQR.

use crate::error::AppError;

/// A specialized `Result` type for BetterQR operations.
pub type AppResult<T> = Result<T, AppError>;
