//! Quote domain model

use crate::types::Validator;
use serde::{Deserialize, Serialize};

/// A single quote: free text plus the category it is filed under.
///
/// Matching between local and remote collections is done on `text` alone
/// (exact, case-sensitive). Two quotes with the same text and different
/// categories are a conflict, not two distinct quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

impl Quote {
    /// Creates a quote from text and category as given
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Creates a quote from user input, trimming surrounding whitespace
    pub fn from_input(text: &str, category: &str) -> Self {
        Self::new(text.trim(), category.trim())
    }

    /// Returns true if both quotes carry the same text
    pub fn same_text(&self, other: &Quote) -> bool {
        self.text == other.text
    }

    /// Returns true if both quotes carry the same text but disagree on category
    pub fn conflicts_with(&self, other: &Quote) -> bool {
        self.same_text(other) && self.category != other.category
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

impl Validator for Quote {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.text.trim().is_empty() {
            errors.push("Quote text cannot be empty".to_string());
        }

        if self.category.trim().is_empty() {
            errors.push("Quote category cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Seed collection used when nothing has been persisted yet
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The only way to do great work is to love what you do.",
            "Inspiration",
        ),
        Quote::new(
            "Innovation distinguishes between a leader and a follower.",
            "Leadership",
        ),
        Quote::new(
            "Life is what happens to you while you're busy making other plans.",
            "Life",
        ),
        Quote::new(
            "The future belongs to those who believe in the beauty of their dreams.",
            "Dreams",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_trims() {
        let quote = Quote::from_input("  Be kind  ", "\tLife\n");
        assert_eq!(quote.text, "Be kind");
        assert_eq!(quote.category, "Life");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let quote = Quote::new("Be kind", "   ");
        let errors = quote.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("category"));

        let quote = Quote::new("", "");
        assert_eq!(quote.validate().unwrap_err().len(), 2);
    }

    #[test]
    fn test_conflicts_with_is_case_sensitive() {
        let local = Quote::new("Be kind", "A");
        assert!(local.conflicts_with(&Quote::new("Be kind", "B")));
        assert!(!local.conflicts_with(&Quote::new("Be kind", "A")));
        assert!(!local.conflicts_with(&Quote::new("be kind", "B")));
    }

    #[test]
    fn test_display() {
        let quote = Quote::new("Be kind", "Life");
        assert_eq!(quote.to_string(), "\"Be kind\" - Life");
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let quote: Quote = serde_json::from_str(r#"{"text":"Only text"}"#).unwrap();
        assert_eq!(quote.text, "Only text");
        assert!(quote.category.is_empty());
    }

    #[test]
    fn test_default_quotes_are_valid() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 4);
        assert!(quotes.iter().all(|q| q.is_valid()));
    }
}
