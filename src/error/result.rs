//! Result type alias for ratewatch operations.

use super::app_error::AppError;

/// Type alias for Results using AppError.
pub type AppResult<T> = Result<T, AppError>;
