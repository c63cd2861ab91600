//! Domain types for QuoteSync
//!
//! - `quote`: the `Quote` record and the default seed collection
//! - `filter`: category selection and derived category lists
//! - `common`: shared traits

mod common;
mod filter;
mod quote;

// Re-export all public types
pub use common::Validator;
pub use filter::{categories_of, CategoryFilter, ALL_CATEGORIES};
pub use quote::{default_quotes, Quote};
