//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, non-2xx status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API returned an error envelope
    #[error("API error: {0}")]
    Api(String),

    /// Authentication failed or no credential source configured
    #[error("Authorization error: {0}")]
    Auth(String),

    /// Requested object does not exist on the remote platform
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
