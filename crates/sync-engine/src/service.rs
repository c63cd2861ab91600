// crates/sync-engine/src/service.rs
//! User actions: render, filter, add, import, export
//!
//! These are the only places besides the coordinator that touch the shared
//! store, and they take the same lock.

use crate::engine::{SharedStore, SyncCoordinator};
use crate::error::{log_failure, SyncError, SyncResult};
use crate::presentation::{NotificationLevel, PresentationSink};
use crate::scheduler::SchedulerHandle;
use quotesync_core::{CategoryFilter, Quote};
use quotesync_store::{QuoteStore, StoreError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// How long to wait before syncing after a local change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDelays {
    pub after_add: Duration,
    pub after_import: Duration,
}

impl Default for ActionDelays {
    fn default() -> Self {
        Self {
            after_add: Duration::from_millis(1000),
            after_import: Duration::from_millis(1500),
        }
    }
}

/// Handles direct user actions against the shared store
pub struct QuoteService {
    coordinator: SyncCoordinator,
    store: SharedStore,
    sink: Arc<dyn PresentationSink>,
    scheduler: Option<SchedulerHandle>,
    delays: ActionDelays,
    rng: Mutex<StdRng>,
}

impl QuoteService {
    /// Creates a service sharing the coordinator's store and sink
    pub fn new(coordinator: SyncCoordinator) -> Self {
        Self {
            store: coordinator.store(),
            sink: coordinator.sink(),
            coordinator,
            scheduler: None,
            delays: ActionDelays::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Requests deferred syncs through `handle` after adds and imports
    pub fn with_scheduler(mut self, handle: SchedulerHandle, delays: ActionDelays) -> Self {
        self.scheduler = Some(handle);
        self.delays = delays;
        self
    }

    /// Uses a fixed random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    /// Shows a random quote from the current filter
    pub async fn show_random(&self) -> Option<Quote> {
        let store = self.store.lock().await;
        self.render_random(&store)
    }

    /// Startup rendering
    ///
    /// A category filter shows a quote from that category. Otherwise the
    /// quote last viewed in this session comes back, or a random one.
    pub async fn restore_view(&self) -> Option<Quote> {
        let store = self.store.lock().await;
        self.sink
            .update_category_options(store.categories(), store.filter().as_str());
        self.sink.update_sync_status(store.last_sync());

        if store.filter().is_all() {
            if let Some(quote) = store.last_viewed() {
                self.sink.show_quote(&quote, &total_label(&store));
                return Some(quote);
            }
        }
        self.render_random(&store)
    }

    /// Selects a category filter and shows a quote from it
    pub async fn select_filter(
        &self,
        filter: impl Into<CategoryFilter>,
    ) -> SyncResult<Option<Quote>> {
        let filter = filter.into();
        let mut store = self.store.lock().await;
        store.set_filter(filter)?;
        log::debug!("Filter set to '{}'", store.filter());

        self.sink
            .update_category_options(store.categories(), store.filter().as_str());
        Ok(self.render_random(&store))
    }

    /// Adds a quote, uploads it best-effort and schedules a sync
    pub async fn add_quote(&self, text: &str, category: &str) -> SyncResult<Quote> {
        let quote = {
            let mut store = self.store.lock().await;
            let quote = match store.add(text, category) {
                Ok(quote) => quote,
                Err(e) => return Err(self.report_failure(e)),
            };

            self.sink
                .show_notification("Quote added successfully!", NotificationLevel::Success);
            self.sink.show_quote(&quote, "");
            remember(&store, &quote);
            self.sink
                .update_category_options(store.categories(), store.filter().as_str());
            quote
        };

        if let Err(e) = self.coordinator.remote().submit(&quote).await {
            log::warn!("Failed to upload quote to server: {}", e);
            self.sink.show_notification(
                &format!("Quote saved locally but could not be sent to the server: {}", e),
                NotificationLevel::Warning,
            );
        }

        self.defer_sync(self.delays.after_add);
        Ok(quote)
    }

    /// Appends quotes from a JSON array and schedules a sync
    pub async fn import_json(&self, json: &str) -> SyncResult<usize> {
        let mut store = self.store.lock().await;
        let added = match store.import_json(json) {
            Ok(added) => added,
            Err(e) => return Err(self.report_failure(e)),
        };

        self.sink.show_notification(
            &format!("Quotes imported successfully! Added {} new quotes.", added),
            NotificationLevel::Success,
        );
        self.sink
            .update_category_options(store.categories(), store.filter().as_str());
        self.render_random(&store);
        drop(store);

        self.defer_sync(self.delays.after_import);
        Ok(added)
    }

    /// Serializes the collection for export
    pub async fn export_json(&self) -> SyncResult<String> {
        let store = self.store.lock().await;
        match store.export_json() {
            Ok(json) => {
                self.sink
                    .show_notification("Quotes exported successfully!", NotificationLevel::Success);
                Ok(json)
            }
            Err(e) if e.is_validation() => {
                self.sink
                    .show_notification("No quotes to export!", NotificationLevel::Warning);
                Err(e.into())
            }
            Err(e) => Err(self.report_failure(e)),
        }
    }

    /// Returns the category options, `all` first
    pub async fn categories(&self) -> Vec<String> {
        self.store.lock().await.categories().to_vec()
    }

    fn render_random(&self, store: &QuoteStore) -> Option<Quote> {
        let picked = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            store.pick_random(&mut *rng)
        };

        let Some(quote) = picked else {
            self.sink.show_empty_state();
            return None;
        };

        let context = if store.filter().is_all() {
            total_label(store)
        } else {
            format!("Showing from {} quotes in this category", store.filtered().len())
        };
        self.sink.show_quote(&quote, &context);
        remember(store, &quote);
        Some(quote)
    }

    fn report_failure(&self, err: StoreError) -> SyncError {
        log_failure("Quote action", &err.classify());
        self.sink
            .show_notification(&err.user_message(), NotificationLevel::Error);
        err.into()
    }

    fn defer_sync(&self, delay: Duration) {
        if let Some(scheduler) = &self.scheduler {
            if !scheduler.request_sync_after(delay) {
                log::debug!("Scheduler stopped, deferred sync dropped");
            }
        }
    }
}

fn total_label(store: &QuoteStore) -> String {
    format!("Total quotes: {}", store.len())
}

fn remember(store: &QuoteStore, quote: &Quote) {
    if let Err(e) = store.remember_viewed(quote) {
        log::debug!("Could not remember viewed quote: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shared_store;
    use crate::presentation::{RecordingSink, RenderCommand};
    use crate::remote::StaticRemote;
    use quotesync_store::MemoryStore;

    fn setup() -> (QuoteService, Arc<StaticRemote>, Arc<RecordingSink>) {
        let store = QuoteStore::open(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()));
        let remote = Arc::new(StaticRemote::new(Vec::new()));
        let sink = Arc::new(RecordingSink::new());
        let coordinator = SyncCoordinator::new(shared_store(store), remote.clone(), sink.clone());
        let service = QuoteService::new(coordinator).with_rng(StdRng::seed_from_u64(42));
        (service, remote, sink)
    }

    #[tokio::test]
    async fn test_show_random_labels_total() {
        let (service, _remote, sink) = setup();
        let quote = service.show_random().await.unwrap();

        let (shown, context) = sink.last_quote().unwrap();
        assert_eq!(shown, quote);
        assert_eq!(context, "Total quotes: 4");
    }

    #[tokio::test]
    async fn test_filter_labels_category_count() {
        let (service, _remote, sink) = setup();
        let quote = service.select_filter("Life").await.unwrap().unwrap();
        assert_eq!(quote.category, "Life");

        let (_, context) = sink.last_quote().unwrap();
        assert_eq!(context, "Showing from 1 quotes in this category");
    }

    #[tokio::test]
    async fn test_filter_without_matches_shows_empty_state() {
        let (service, _remote, sink) = setup();
        assert!(service.select_filter("Cooking").await.unwrap().is_none());
        assert_eq!(sink.commands().last(), Some(&RenderCommand::EmptyState));
    }

    #[tokio::test]
    async fn test_add_rejects_empty_category() {
        let (service, remote, sink) = setup();
        let err = service.add_quote("Be kind", "  ").await.unwrap_err();

        assert!(matches!(err, SyncError::Store(ref e) if e.is_validation()));
        assert_eq!(service.store.lock().await.len(), 4);
        assert_eq!(
            sink.notifications_at(NotificationLevel::Error),
            vec!["Please enter both quote text and category."]
        );
        assert!(remote.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_submits_to_remote() {
        let (service, remote, sink) = setup();
        let quote = service.add_quote("Be kind", "Life").await.unwrap();

        assert_eq!(remote.snapshot().unwrap(), vec![quote.clone()]);
        assert_eq!(sink.last_quote(), Some((quote, String::new())));
        assert_eq!(
            sink.notifications_at(NotificationLevel::Success),
            vec!["Quote added successfully!"]
        );
    }

    #[tokio::test]
    async fn test_add_survives_submit_failure() {
        let (service, remote, sink) = setup();
        remote.set_failing(true);

        service.add_quote("Be kind", "Life").await.unwrap();
        assert_eq!(service.store.lock().await.len(), 5);
        assert_eq!(sink.notifications_at(NotificationLevel::Warning).len(), 1);
    }

    #[tokio::test]
    async fn test_import_reports_count() {
        let (service, _remote, sink) = setup();
        let added = service
            .import_json(r#"[{"text":"A","category":"x"},{"text":"B","category":"y"}]"#)
            .await
            .unwrap();

        assert_eq!(added, 2);
        assert!(sink
            .notifications_at(NotificationLevel::Success)
            .contains(&"Quotes imported successfully! Added 2 new quotes.".to_string()));
        assert_eq!(service.categories().await.len(), 7);
    }

    #[tokio::test]
    async fn test_import_rejects_object() {
        let (service, _remote, sink) = setup();
        assert!(service.import_json(r#"{"text":"A"}"#).await.is_err());
        assert_eq!(
            sink.notifications_at(NotificationLevel::Error),
            vec!["Invalid JSON format. Expected an array of quotes."]
        );
    }

    #[tokio::test]
    async fn test_export_empty_warns() {
        let (service, _remote, sink) = setup();
        service.store.lock().await.replace_all(Vec::new()).unwrap();

        assert!(service.export_json().await.is_err());
        assert_eq!(
            sink.notifications_at(NotificationLevel::Warning),
            vec!["No quotes to export!"]
        );
    }

    #[tokio::test]
    async fn test_restore_view_prefers_last_viewed() {
        let (service, _remote, sink) = setup();
        let shown = service.show_random().await.unwrap();
        sink.take();

        assert_eq!(service.restore_view().await, Some(shown));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_requests_deferred_sync() {
        use crate::scheduler::{ScheduleConfig, SyncScheduler};

        let (service, remote, sink) = setup();
        remote.set_quotes(crate::remote::server_quotes()).unwrap();
        let config = ScheduleConfig {
            startup_delay: Duration::from_secs(3600),
            interval: Duration::from_secs(3600),
        };
        let (scheduler, handle) = SyncScheduler::new(service.coordinator().clone(), config);
        let task = scheduler.spawn();
        let service = service.with_scheduler(handle.clone(), ActionDelays::default());

        service.add_quote("Be kind", "Life").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1_100)).await;

        assert!(sink
            .notifications_at(NotificationLevel::Success)
            .iter()
            .any(|m| m.starts_with("Sync completed!")));

        handle.shutdown();
        task.await.unwrap();
    }
}
