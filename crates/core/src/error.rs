//! Error taxonomy and recovery strategies for QuoteSync
//!
//! Every failure the user can see falls into one of four families:
//! - **Validation**: rejected input (empty text or category), nothing stored
//! - **Parse**: malformed import file or persisted state, defaults used instead
//! - **Transport**: the remote quote service could not be reached
//! - **Storage**: the local key-value store refused a read or write
//!
//! None of them is fatal. Each carries a recovery action that tells the caller
//! how the application continues.

use std::fmt;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Discard the input and let the user correct it
    RejectInput,
    /// Continue with the default or empty collection
    UseDefaults,
    /// Abandon the current sync cycle and wait for the next scheduled one
    WaitForNextSync,
    /// Keep the in-memory state and try persisting again later
    RetryPersist,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectInput => write!(f, "Rejecting input"),
            Self::UseDefaults => write!(f, "Falling back to defaults"),
            Self::WaitForNextSync => write!(f, "Waiting for next sync"),
            Self::RetryPersist => write!(f, "Retrying persistence later"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The failing operation had no effect and the app carries on
    Recoverable,
    /// The app carries on with reduced fidelity (defaults, stale data)
    Degraded,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
        }
    }
}

/// Main error type for QuoteSync
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field was missing or blank
    #[error("Validation error: {field} {reason}")]
    Validation { field: String, reason: String },

    /// Input or persisted data could not be decoded
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// The remote quote service failed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The local key-value store failed
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } | Self::Transport { .. } => ErrorSeverity::Recoverable,
            Self::Parse { .. } | Self::Storage { .. } => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::Validation { .. } => RecoveryAction::RejectInput,
            Self::Parse { .. } => RecoveryAction::UseDefaults,
            Self::Transport { .. } => RecoveryAction::WaitForNextSync,
            Self::Storage { .. } => RecoveryAction::RetryPersist,
        }
    }

    /// Returns a user-friendly error message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { .. } => "Please enter both quote text and category.".to_string(),
            Self::Parse { context, message } => {
                format!("Error parsing {}: {}", context, message)
            }
            Self::Transport { message } => format!("Sync failed: {}", message),
            Self::Storage { .. } => {
                "Could not save quotes locally. Changes are kept for this session.".to_string()
            }
        }
    }

    /// Helper to create a validation error for a field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create a parse error
    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Helper to create a storage error from any error type
    pub fn storage<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
