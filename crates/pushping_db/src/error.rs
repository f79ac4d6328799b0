//! Error types for the database client

use pushping_common::PushPingError;
use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// The connection could not be established in time
    #[error("Database connection timed out after {0}s")]
    ConnectTimeout(u64),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A stored value could not be read back
    #[error("Database decode error: {0}")]
    DecodeError(String),
}

impl From<DbError> for PushPingError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConfigError(message) => PushPingError::Config(message),
            other => PushPingError::StoreUnavailable(other.to_string()),
        }
    }
}
