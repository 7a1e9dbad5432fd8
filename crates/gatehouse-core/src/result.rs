//! Result type alias used across the application.

use crate::error::AppError;

/// Convenience alias for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
