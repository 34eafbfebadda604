//! Repository Module
//!
//! CRUD access to the SQLite tables, one module per entity. Functions take
//! `&SqlitePool` for single statements or `&mut SqliteConnection` when they
//! participate in a caller-owned transaction. All queries are scoped by
//! `tenant_id`.

pub mod absence;
pub mod employee;
pub mod leave_balance;
pub mod leave_type;
pub mod manager_assignment;
pub mod project;
pub mod time_category;
pub mod time_entry;
pub mod timesheet;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
