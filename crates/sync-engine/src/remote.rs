// crates/sync-engine/src/remote.rs
//! Remote quote service abstraction

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use quotesync_core::{default_quotes, Quote};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// The server side of synchronization
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetches the full remote collection
    async fn list(&self) -> SyncResult<Vec<Quote>>;

    /// Uploads a single quote
    ///
    /// Callers treat failures as best-effort: the local add has already
    /// happened.
    async fn submit(&self, quote: &Quote) -> SyncResult<()>;
}

/// The collection the built-in mock server starts with
pub fn server_quotes() -> Vec<Quote> {
    let mut quotes = default_quotes();
    quotes.push(Quote::new(
        "Server-side quote: Always code as if the guy who ends up maintaining your code will be a violent psychopath who knows where you live.",
        "Programming",
    ));
    quotes.push(Quote::new(
        "Simplicity is the ultimate sophistication.",
        "Design",
    ));
    quotes
}

/// In-memory remote service
///
/// Used when no endpoint is configured, and in tests. Failures can be
/// switched on to exercise the transport error path.
#[derive(Debug)]
pub struct StaticRemote {
    quotes: Mutex<Vec<Quote>>,
    failing: AtomicBool,
}

impl StaticRemote {
    /// Creates a remote serving `quotes`
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: Mutex::new(quotes),
            failing: AtomicBool::new(false),
        }
    }

    /// Creates a remote seeded with [`server_quotes`]
    pub fn with_server_quotes() -> Self {
        Self::new(server_quotes())
    }

    /// Makes every following call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Replaces the served collection
    pub fn set_quotes(&self, quotes: Vec<Quote>) -> SyncResult<()> {
        *self.lock()? = quotes;
        Ok(())
    }

    /// Returns a copy of the served collection
    pub fn snapshot(&self) -> SyncResult<Vec<Quote>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> SyncResult<std::sync::MutexGuard<'_, Vec<Quote>>> {
        self.quotes
            .lock()
            .map_err(|_| SyncError::transport("mock server state poisoned"))
    }

    fn check_available(&self) -> SyncResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::transport("mock server unavailable"));
        }
        Ok(())
    }
}

impl Default for StaticRemote {
    fn default() -> Self {
        Self::with_server_quotes()
    }
}

#[async_trait]
impl RemoteService for StaticRemote {
    async fn list(&self) -> SyncResult<Vec<Quote>> {
        self.check_available()?;
        self.snapshot()
    }

    async fn submit(&self, quote: &Quote) -> SyncResult<()> {
        self.check_available()?;
        self.lock()?.push(quote.clone());
        log::debug!("Mock server accepted quote in '{}'", quote.category);
        Ok(())
    }
}
