//! Category filtering and derived category lists

use crate::types::Quote;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel category value that selects every quote
pub const ALL_CATEGORIES: &str = "all";

/// The category currently selected for display.
///
/// Persisted as a plain string: `all` or the category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Returns true if the quote is visible under this filter
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.category == *category,
        }
    }

    /// Returns the persisted string form
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }

    /// Returns true if this filter selects every quote
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the category option list for a collection.
///
/// `all` comes first, then each category in the order it is first seen.
pub fn categories_of(quotes: &[Quote]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for quote in quotes {
        if !categories.iter().any(|c| *c == quote.category) {
            categories.push(quote.category.clone());
        }
    }
    categories
}
