// crates/sync-engine/src/error.rs
//! Error types for sync operations

use quotesync_core::{AppError, ErrorSeverity, RecoveryAction};
use quotesync_store::StoreError;
use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during synchronization
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote quote service could not be reached or answered badly
    #[error("Transport error: {0}")]
    Transport(String),

    /// Another sync cycle or resolution is still running
    #[error("Sync already in progress")]
    InProgress,

    /// Local state could not be read or written
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Creates a transport error from any displayable cause
    pub fn transport(message: impl ToString) -> Self {
        Self::Transport(message.to_string())
    }

    /// Returns true if the error came from the remote service
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Places this error in the user-facing taxonomy
    pub fn classify(&self) -> AppError {
        match self {
            Self::Transport(message) => AppError::Transport {
                message: message.clone(),
            },
            Self::InProgress => AppError::Transport {
                message: "sync already in progress".to_string(),
            },
            Self::Store(store) => store.classify(),
            Self::Serialization(e) => AppError::parse("sync data", e),
        }
    }

    /// Returns the text shown to the user when a sync step fails
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(store) => store.user_message(),
            other => other.classify().user_message(),
        }
    }
}

/// Logs a failed operation at the level its severity calls for
///
/// Rejected input is routine and only logged at debug.
pub fn log_failure(operation: &str, error: &AppError) {
    match (error.recovery_action(), error.severity()) {
        (RecoveryAction::RejectInput, _) => log::debug!("{} rejected: {}", operation, error),
        (action, ErrorSeverity::Recoverable) => {
            log::warn!("{} failed: {} ({})", operation, error, action)
        }
        (action, ErrorSeverity::Degraded) => {
            log::error!("{} failed: {} ({})", operation, error, action)
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Transport(message) => AppError::Transport { message },
            SyncError::InProgress => AppError::Transport {
                message: "sync already in progress".to_string(),
            },
            SyncError::Store(store) => store.into(),
            SyncError::Serialization(e) => AppError::parse("sync data", e),
        }
    }
}
