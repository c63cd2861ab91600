//! The quote collection and its persisted companions
//!
//! `QuoteStore` keeps the working collection in memory and mirrors it into a
//! [`KeyValueStore`] on every save, together with the derived category list
//! and the current filter. The last-sync timestamp and the session-only
//! "last viewed" quote are stored alongside.

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use chrono::{DateTime, Utc};
use quotesync_core::{categories_of, default_quotes, CategoryFilter, Quote, Validator};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

/// Persistent key holding the JSON-encoded collection
pub const QUOTES_KEY: &str = "quotes";
/// Persistent key holding the derived category list
pub const CATEGORIES_KEY: &str = "categories";
/// Persistent key holding the selected category filter
pub const FILTER_KEY: &str = "currentFilter";
/// Persistent key holding the RFC 3339 time of the last completed sync
pub const LAST_SYNC_KEY: &str = "lastSyncTimestamp";
/// Session key holding the last rendered quote
pub const LAST_VIEWED_KEY: &str = "lastViewed";

/// Owned quote collection backed by persistent and session storage
pub struct QuoteStore {
    persistent: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
    quotes: Vec<Quote>,
    categories: Vec<String>,
    filter: CategoryFilter,
    last_sync: Option<DateTime<Utc>>,
    recovery_error: Option<StoreError>,
}

impl QuoteStore {
    /// Opens the store and loads whatever state was persisted
    ///
    /// Opening never fails. When the persisted collection is unreadable the
    /// default seed is used and the failure is kept for
    /// [`take_recovery_error`](Self::take_recovery_error).
    pub fn open(persistent: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            persistent,
            session,
            quotes: Vec::new(),
            categories: Vec::new(),
            filter: CategoryFilter::All,
            last_sync: None,
            recovery_error: None,
        };

        store.quotes = match store.load() {
            Ok(quotes) => quotes,
            Err(e) => {
                log::warn!("Failed to load quotes, using default collection: {}", e);
                store.recovery_error = Some(e);
                default_quotes()
            }
        };
        store.categories = categories_of(&store.quotes);
        store.filter = store.read_filter();
        store.last_sync = store.read_last_sync();

        log::debug!(
            "Opened quote store with {} quotes, filter '{}'",
            store.quotes.len(),
            store.filter
        );
        store
    }

    /// Returns the error that forced a fallback during `open`, once
    pub fn take_recovery_error(&mut self) -> Option<StoreError> {
        self.recovery_error.take()
    }

    /// Reads the persisted collection, or the default seed if none exists
    pub fn load(&self) -> StoreResult<Vec<Quote>> {
        match self.persistent.get(QUOTES_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StoreError::parse("stored quotes", e)),
            None => Ok(default_quotes()),
        }
    }

    /// Persists the collection, the derived categories and the filter
    pub fn save(&mut self) -> StoreResult<()> {
        self.categories = categories_of(&self.quotes);

        self.persistent
            .set(QUOTES_KEY, &serde_json::to_string(&self.quotes)?)?;
        self.persistent
            .set(CATEGORIES_KEY, &serde_json::to_string(&self.categories)?)?;
        self.persistent.set(FILTER_KEY, self.filter.as_str())?;

        log::trace!("Saved {} quotes", self.quotes.len());
        Ok(())
    }

    /// Adds a quote from user input
    ///
    /// Both fields are trimmed. If either is then empty nothing is stored.
    pub fn add(&mut self, text: &str, category: &str) -> StoreResult<Quote> {
        let quote = Quote::from_input(text, category);
        if let Err(errors) = quote.validate() {
            return Err(StoreError::Validation(errors.join("; ")));
        }

        self.quotes.push(quote.clone());
        self.save()?;
        log::info!("Added quote in category '{}'", quote.category);
        Ok(quote)
    }

    /// Appends every quote in a JSON array and returns how many were added
    ///
    /// The import is all-or-nothing: a document that isn't an array of
    /// objects leaves the collection untouched. Missing fields become empty
    /// strings. Both fields are trimmed, as in [`QuoteStore::add`].
    pub fn import_json(&mut self, json: &str) -> StoreResult<usize> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| StoreError::parse("import file", e))?;

        let Value::Array(entries) = value else {
            return Err(StoreError::NotAnArray);
        };

        let imported = entries
            .into_iter()
            .map(serde_json::from_value::<Quote>)
            .map(|entry| entry.map(|q| Quote::from_input(&q.text, &q.category)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::parse("import file", e))?;

        let count = imported.len();
        self.quotes.extend(imported);
        self.save()?;
        log::info!("Imported {} quotes", count);
        Ok(count)
    }

    /// Serializes the whole collection as indented JSON
    pub fn export_json(&self) -> StoreResult<String> {
        if self.quotes.is_empty() {
            return Err(StoreError::Validation("No quotes to export".to_string()));
        }
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Returns the current filter
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Selects and persists a new filter
    pub fn set_filter(&mut self, filter: CategoryFilter) -> StoreResult<()> {
        self.persistent.set(FILTER_KEY, filter.as_str())?;
        self.filter = filter;
        Ok(())
    }

    /// Returns the quotes visible under the current filter
    pub fn filtered(&self) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|quote| self.filter.matches(quote))
            .collect()
    }

    /// Picks a random quote from the filtered view
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Quote> {
        self.filtered().choose(rng).map(|quote| (*quote).clone())
    }

    /// Records the quote last shown, for this session only
    pub fn remember_viewed(&self, quote: &Quote) -> StoreResult<()> {
        self.session
            .set(LAST_VIEWED_KEY, &serde_json::to_string(quote)?)
    }

    /// Returns the quote last shown in this session, if readable
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = match self.session.get(LAST_VIEWED_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::debug!("Could not read last viewed quote: {}", e);
                return None;
            }
        };
        serde_json::from_str(&raw).ok()
    }

    /// Returns the time of the last completed sync
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    /// Records and persists the time of a completed sync
    pub fn set_last_sync(&mut self, at: DateTime<Utc>) -> StoreResult<()> {
        self.persistent.set(LAST_SYNC_KEY, &at.to_rfc3339())?;
        self.last_sync = Some(at);
        Ok(())
    }

    /// Replaces the whole collection and persists it
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> StoreResult<()> {
        self.quotes = quotes;
        self.save()
    }

    /// Returns the in-memory collection
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Returns the derived category list, `all` first
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    fn read_filter(&self) -> CategoryFilter {
        match self.persistent.get(FILTER_KEY) {
            Ok(Some(raw)) => CategoryFilter::from(raw),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                log::warn!("Could not read filter, showing all categories: {}", e);
                CategoryFilter::All
            }
        }
    }

    fn read_last_sync(&self) -> Option<DateTime<Utc>> {
        let raw = match self.persistent.get(LAST_SYNC_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Could not read last sync time: {}", e);
                return None;
            }
        };

        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                log::warn!("Ignoring malformed last sync time '{}': {}", raw, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for QuoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteStore")
            .field("quotes", &self.quotes.len())
            .field("filter", &self.filter)
            .field("last_sync", &self.last_sync)
            .finish()
    }
}
