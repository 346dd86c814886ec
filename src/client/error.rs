//! Error types for the network clients.

use thiserror::Error;

/// Errors a client call can resolve to.
///
/// Cloneable so it can travel inside actions back to the reducers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connection failed or the request could not be built.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}
