// crates/network/src/error.rs
//! Error types for network operations

use quotesync_sync_engine::SyncError;
use thiserror::Error;

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur while talking to the quote server
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request error (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body was not what the server is supposed to send
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl NetworkError {
    /// Returns true if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, NetworkError::Http(e) if e.is_timeout())
    }

    /// Returns true if the error is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        match self {
            NetworkError::Status { status, .. } => (400..500).contains(status),
            NetworkError::Http(e) => e.status().is_some_and(|s| s.is_client_error()),
            _ => false,
        }
    }

    /// Returns true if the error is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        match self {
            NetworkError::Status { status, .. } => (500..600).contains(status),
            NetworkError::Http(e) => e.status().is_some_and(|s| s.is_server_error()),
            _ => false,
        }
    }
}

impl From<NetworkError> for SyncError {
    fn from(err: NetworkError) -> Self {
        SyncError::Transport(err.to_string())
    }
}
