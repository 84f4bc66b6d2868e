//! Error types for the ORM.

use thiserror::Error;

/// ORM-specific errors.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Error reported by a non-sqlx driver (HTTP transport, server response).
    #[error("driver error: {0}")]
    Driver(String),

    /// No driver is registered under the requested name.
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// The session has no connection pool installed.
    #[error("no connection pool installed")]
    NoConnection,

    /// Invalid field name.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, OrmError>;
