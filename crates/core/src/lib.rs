//! Core domain model for QuoteSync
//!
//! Everything the other crates agree on lives here: the `Quote` record,
//! category filtering, the default seed collection and the user-facing
//! error taxonomy.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    categories_of, default_quotes, CategoryFilter, Quote, Validator, ALL_CATEGORIES,
};
