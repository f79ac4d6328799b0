// --- File: crates/pushping_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// Message returned to callers when no token was supplied.
pub const TOKEN_REQUIRED: &str = "token required";

/// The error type shared by every pushping crate.
///
/// Crate-local errors (database, HTTP client) convert into one of these
/// variants at the crate boundary, so the endpoint and the scheduler only ever
/// reason about this taxonomy.
#[derive(Error, Debug)]
pub enum PushPingError {
    /// Caller-supplied data failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// The token store could not be reached or the operation against it failed
    #[error("Token store unavailable: {0}")]
    StoreUnavailable(String),

    /// The push gateway answered with a non-success response
    #[error("Push gateway rejected the request (Status: {status}): {body}")]
    GatewayRejected { status: u16, body: String },

    /// The push gateway could not be reached at the transport level
    #[error("Push gateway unreachable: {0}")]
    GatewayUnreachable(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for PushPingError {
    fn status_code(&self) -> u16 {
        match self {
            PushPingError::InvalidInput(_) => 400,
            PushPingError::StoreUnavailable(_) => 500,
            PushPingError::GatewayRejected { .. } => 502,
            PushPingError::GatewayUnreachable(_) => 504,
            PushPingError::Config(_) => 500,
        }
    }
}

impl PushPingError {
    /// The message shown to HTTP callers.
    ///
    /// Validation messages are returned verbatim; everything else is reduced to
    /// a fixed text and the details go to the log only.
    pub fn public_message(&self) -> String {
        match self {
            PushPingError::InvalidInput(message) => message.clone(),
            PushPingError::StoreUnavailable(_) | PushPingError::Config(_) => {
                "❌ save failed".to_string()
            }
            PushPingError::GatewayRejected { .. } | PushPingError::GatewayUnreachable(_) => {
                "❌ push failed".to_string()
            }
        }
    }
}

// Utility functions for error handling
pub fn invalid_input<T: fmt::Display>(message: T) -> PushPingError {
    PushPingError::InvalidInput(message.to_string())
}

pub fn store_unavailable<T: fmt::Display>(message: T) -> PushPingError {
    PushPingError::StoreUnavailable(message.to_string())
}
