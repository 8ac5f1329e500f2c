//! Error types for BMC fan operations

use thiserror::Error;

/// Error type for BMC fan operations
#[derive(Debug, Error)]
pub enum BmcError {
    /// Transport-level failure talking to the BMC
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The BMC answered, but the response lacks an expected field
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// The login handshake did not yield a usable session
    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Result type for BMC fan operations
pub type Result<T> = std::result::Result<T, BmcError>;
