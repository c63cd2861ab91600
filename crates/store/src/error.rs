//! Error types for the quote store

use quotesync_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing local state
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input was rejected before anything was stored
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Stored or imported data could not be decoded
    #[error("Failed to parse {context}: {message}")]
    Parse { context: String, message: String },

    /// An import document was valid JSON but not an array
    #[error("Invalid JSON format. Expected an array of quotes.")]
    NotAnArray,

    /// Key contains characters the backend cannot store
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// File backend I/O failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backend lock was poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Creates a parse error for the given context
    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if the error came from user input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Places this error in the user-facing taxonomy
    pub fn classify(&self) -> AppError {
        match self {
            Self::Validation(reason) => AppError::validation("quote", reason.clone()),
            Self::Parse { context, message } => AppError::Parse {
                context: context.clone(),
                message: message.clone(),
            },
            Self::NotAnArray => AppError::parse("import file", self),
            other => AppError::Storage {
                message: other.to_string(),
                source: None,
            },
        }
    }

    /// Returns the notification text for this error
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAnArray => self.to_string(),
            other => other.classify().user_message(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(reason) => AppError::validation("quote", reason),
            StoreError::Parse { context, message } => AppError::Parse { context, message },
            StoreError::NotAnArray => AppError::parse("import file", StoreError::NotAnArray),
            other => AppError::storage("local store", other),
        }
    }
}
