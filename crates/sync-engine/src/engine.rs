// crates/sync-engine/src/engine.rs
//! Sync coordinator: fetch, detect, resolve, merge, persist, notify

use crate::conflict::{detect_conflicts, resolve_conflicts};
use crate::error::{log_failure, SyncError, SyncResult};
use crate::merge::merge;
use crate::presentation::{NotificationLevel, PresentationSink};
use crate::remote::RemoteService;
use crate::types::{Conflict, PhaseTransition, SyncPhase, SyncReport, SyncTrigger};
use chrono::Utc;
use quotesync_store::QuoteStore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The quote store shared between the coordinator and user actions
pub type SharedStore = Arc<tokio::sync::Mutex<QuoteStore>>;

/// Wraps a store for sharing
pub fn shared_store(store: QuoteStore) -> SharedStore {
    Arc::new(tokio::sync::Mutex::new(store))
}

const TRANSITION_HISTORY: usize = 32;

#[derive(Debug)]
struct PhaseState {
    phase: SyncPhase,
    history: VecDeque<PhaseTransition>,
}

impl PhaseState {
    fn enter(&mut self, to: SyncPhase) {
        let from = self.phase;
        self.phase = to;
        log::debug!("Sync phase {} -> {}", from, to);

        if self.history.len() == TRANSITION_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(PhaseTransition {
            from,
            to,
            at: Utc::now(),
        });
    }
}

struct Inner {
    store: SharedStore,
    remote: Arc<dyn RemoteService>,
    sink: Arc<dyn PresentationSink>,
    state: Mutex<PhaseState>,
    resolution_enabled: AtomicBool,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, PhaseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the in-flight guard, or returns None if a cycle is running
    fn try_begin(&self, first: SyncPhase) -> Option<InFlight<'_>> {
        let mut state = self.state();
        if state.phase.is_busy() {
            return None;
        }
        state.enter(first);
        Some(InFlight { inner: self })
    }
}

/// Held for the duration of one cycle. Dropping it returns to `Idle`.
struct InFlight<'a> {
    inner: &'a Inner,
}

impl InFlight<'_> {
    fn enter(&self, phase: SyncPhase) {
        self.inner.state().enter(phase);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.inner.state().enter(SyncPhase::Idle);
    }
}

/// Orchestrates sync cycles against a remote service
///
/// At most one cycle (or manual resolution) runs at a time; a trigger that
/// arrives while one is in flight is skipped. Cloning is cheap and every
/// clone shares the same guard.
#[derive(Clone)]
pub struct SyncCoordinator {
    inner: Arc<Inner>,
}

impl SyncCoordinator {
    /// Creates a coordinator with automatic conflict resolution enabled
    pub fn new(
        store: SharedStore,
        remote: Arc<dyn RemoteService>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                remote,
                sink,
                state: Mutex::new(PhaseState {
                    phase: SyncPhase::Idle,
                    history: VecDeque::with_capacity(TRANSITION_HISTORY),
                }),
                resolution_enabled: AtomicBool::new(true),
            }),
        }
    }

    /// Sets the initial conflict resolution flag without notifying
    pub fn with_conflict_resolution(self, enabled: bool) -> Self {
        self.inner.resolution_enabled.store(enabled, Ordering::SeqCst);
        self
    }

    /// Returns the shared store
    pub fn store(&self) -> SharedStore {
        self.inner.store.clone()
    }

    /// Returns the presentation sink
    pub fn sink(&self) -> Arc<dyn PresentationSink> {
        self.inner.sink.clone()
    }

    /// Returns the remote service
    pub fn remote(&self) -> Arc<dyn RemoteService> {
        self.inner.remote.clone()
    }

    /// Returns the current state machine phase
    pub fn phase(&self) -> SyncPhase {
        self.inner.state().phase
    }

    /// Returns the most recent transitions, oldest first
    pub fn recent_transitions(&self) -> Vec<PhaseTransition> {
        self.inner.state().history.iter().copied().collect()
    }

    pub fn conflict_resolution_enabled(&self) -> bool {
        self.inner.resolution_enabled.load(Ordering::SeqCst)
    }

    /// Enables or disables automatic conflict resolution
    pub fn set_conflict_resolution(&self, enabled: bool) {
        self.inner.resolution_enabled.store(enabled, Ordering::SeqCst);
        let state = if enabled { "enabled" } else { "disabled" };
        log::info!("Conflict resolution {}", state);
        self.notify(&format!("Conflict resolution {}", state), NotificationLevel::Info);
    }

    /// Flips automatic conflict resolution and returns the new value
    pub fn toggle_conflict_resolution(&self) -> bool {
        let enabled = !self.conflict_resolution_enabled();
        self.set_conflict_resolution(enabled);
        enabled
    }

    /// Runs one sync cycle unless another is already in flight
    pub async fn trigger_sync(&self) -> SyncTrigger {
        let Some(flight) = self.inner.try_begin(SyncPhase::Fetching) else {
            log::debug!("Sync already in progress, skipping trigger");
            return SyncTrigger::Skipped;
        };

        self.notify("Syncing with server...", NotificationLevel::Info);

        match self.run_cycle(&flight).await {
            Ok(report) => {
                log::info!(
                    "Sync completed: {} conflicts ({} resolved), {} quotes added",
                    report.conflicts_found,
                    report.conflicts_resolved,
                    report.quotes_added
                );
                SyncTrigger::Completed(report)
            }
            Err(e) => {
                flight.enter(SyncPhase::Failed);
                log_failure("Sync", &e.classify());
                let message = e.user_message();
                self.notify(&message, NotificationLevel::Error);
                SyncTrigger::Failed(message)
            }
        }
    }

    async fn run_cycle(&self, flight: &InFlight<'_>) -> SyncResult<SyncReport> {
        let remote_quotes = self.inner.remote.list().await?;

        flight.enter(SyncPhase::Reconciling);
        let enabled = self.conflict_resolution_enabled();
        let mut store = self.inner.store.lock().await;

        let local = store.quotes().to_vec();
        let conflicts = detect_conflicts(&local, &remote_quotes);
        if !conflicts.is_empty() {
            self.notify(
                &format!("Found {} conflicts during sync", conflicts.len()),
                NotificationLevel::Warning,
            );
        }

        let resolution = resolve_conflicts(&conflicts, local, enabled);
        if !conflicts.is_empty() {
            self.report_resolution(enabled, resolution.resolved);
        }

        let merged = merge(&resolution.collection, &remote_quotes);
        let quotes_added = merged.len() - resolution.collection.len();

        flight.enter(SyncPhase::Persisting);
        // On a failed write the merged quotes stay in memory; the next save persists them
        store.replace_all(merged)?;
        let completed_at = Utc::now();
        store.set_last_sync(completed_at)?;
        self.publish(&store);

        if quotes_added > 0 {
            self.notify(
                &format!("Sync completed! Added {} new quotes from server.", quotes_added),
                NotificationLevel::Success,
            );
        } else {
            self.notify("Sync completed! Data is up to date.", NotificationLevel::Success);
        }

        Ok(SyncReport {
            conflicts_found: conflicts.len(),
            conflicts_resolved: resolution.resolved,
            resolution_enabled: enabled,
            quotes_added,
            completed_at,
        })
    }

    /// Fetches the remote collection and lists conflicts without changing anything
    pub async fn preview_conflicts(&self) -> SyncResult<Vec<Conflict>> {
        let remote_quotes = match self.inner.remote.list().await {
            Ok(quotes) => quotes,
            Err(e) => {
                log_failure("Conflict preview", &e.classify());
                self.notify(&e.user_message(), NotificationLevel::Error);
                return Err(e);
            }
        };

        let conflicts = {
            let store = self.inner.store.lock().await;
            detect_conflicts(store.quotes(), &remote_quotes)
        };

        if conflicts.is_empty() {
            self.notify("No conflicts found!", NotificationLevel::Success);
        }
        Ok(conflicts)
    }

    /// Applies previously previewed conflicts and returns how many were resolved
    ///
    /// The resolution flag still applies: with resolution disabled nothing
    /// changes. Conflicts that went stale since the preview are skipped.
    pub async fn confirm_resolution(&self, conflicts: &[Conflict]) -> SyncResult<usize> {
        let flight = self
            .inner
            .try_begin(SyncPhase::Reconciling)
            .ok_or(SyncError::InProgress)?;

        let enabled = self.conflict_resolution_enabled();
        let mut store = self.inner.store.lock().await;
        let resolution = resolve_conflicts(conflicts, store.quotes().to_vec(), enabled);
        self.report_resolution(enabled, resolution.resolved);

        if !enabled {
            return Ok(0);
        }

        flight.enter(SyncPhase::Persisting);
        store.replace_all(resolution.collection)?;
        self.publish(&store);
        self.notify("Manual conflict resolution completed!", NotificationLevel::Success);

        log::info!("Manually resolved {} conflicts", resolution.resolved);
        Ok(resolution.resolved)
    }

    fn report_resolution(&self, enabled: bool, resolved: usize) {
        if enabled {
            self.notify(
                &format!("Automatically resolved {} conflicts.", resolved),
                NotificationLevel::Success,
            );
        } else {
            self.notify(
                "Conflict resolution is disabled. Conflicts not resolved.",
                NotificationLevel::Warning,
            );
        }
    }

    fn publish(&self, store: &QuoteStore) {
        self.inner
            .sink
            .update_category_options(store.categories(), store.filter().as_str());
        self.inner.sink.update_sync_status(store.last_sync());
    }

    fn notify(&self, message: &str, level: NotificationLevel) {
        self.inner.sink.show_notification(message, level);
    }
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("phase", &self.phase())
            .field("resolution_enabled", &self.conflict_resolution_enabled())
            .finish()
    }
}
