//! Convenience result type alias for the bookstore crates.

use crate::error::AppError;

/// A specialized `Result` type for bookstore operations.
pub type AppResult<T> = Result<T, AppError>;
