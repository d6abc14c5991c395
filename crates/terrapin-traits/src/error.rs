//! Error types for data source operations.

use thiserror::Error;

/// Common error type for data source operations.
#[derive(Debug, Error)]
pub enum TraitError {
    /// Connection to external service failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// Authentication failed
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Operation timed out
    #[error("timeout")]
    Timeout,

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}
