//! Utility module — error types, time conversion, validation helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, FieldErrors, ok};

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
