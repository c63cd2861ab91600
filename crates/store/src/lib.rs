//! Local state for QuoteSync
//!
//! A [`KeyValueStore`] is the persistence collaborator: plain string values
//! under fixed keys. [`QuoteStore`] sits on top and owns the working quote
//! collection, the selected filter and the last-sync timestamp.
//!
//! # Example
//!
//! ```
//! use quotesync_store::{MemoryStore, QuoteStore};
//!
//! let mut store = QuoteStore::open(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()));
//! store.add("Be kind", "Life").unwrap();
//! assert_eq!(store.len(), 5);
//! ```

pub mod error;
pub mod kv;
pub mod quote_store;

pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use quote_store::{
    QuoteStore, CATEGORIES_KEY, FILTER_KEY, LAST_SYNC_KEY, LAST_VIEWED_KEY, QUOTES_KEY,
};
