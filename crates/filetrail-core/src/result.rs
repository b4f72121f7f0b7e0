//! Convenience result type alias for FileTrail.

use crate::error::AppError;

/// A specialized `Result` type for FileTrail operations.
pub type AppResult<T> = Result<T, AppError>;
