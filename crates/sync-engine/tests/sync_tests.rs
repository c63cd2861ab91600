// crates/sync-engine/tests/sync_tests.rs
//! Integration tests for sync engine

use async_trait::async_trait;
use quotesync_core::Quote;
use quotesync_store::{
    KeyValueStore, MemoryStore, QuoteStore, StoreError, StoreResult, QUOTES_KEY,
};
use quotesync_sync_engine::{
    detect_conflicts, merge, resolve_conflicts, shared_store, NotificationLevel, RecordingSink,
    RemoteService, StaticRemote, SyncCoordinator, SyncError, SyncPhase, SyncResult, SyncTrigger,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

fn q(text: &str, category: &str) -> Quote {
    Quote::new(text, category)
}

fn store_with(quotes: Vec<Quote>) -> QuoteStore {
    let mut store = QuoteStore::open(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()));
    store.replace_all(quotes).unwrap();
    store
}

fn coordinator_with(
    local: Vec<Quote>,
    remote: Arc<dyn RemoteService>,
) -> (SyncCoordinator, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let coordinator = SyncCoordinator::new(shared_store(store_with(local)), remote, sink.clone());
    (coordinator, sink)
}

/// Remote whose `list` blocks until released
struct GatedRemote {
    quotes: Vec<Quote>,
    entered: Notify,
    release: Notify,
    lists: AtomicUsize,
}

impl GatedRemote {
    fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            entered: Notify::new(),
            release: Notify::new(),
            lists: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RemoteService for GatedRemote {
    async fn list(&self) -> SyncResult<Vec<Quote>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.quotes.clone())
    }

    async fn submit(&self, _quote: &Quote) -> SyncResult<()> {
        Ok(())
    }
}

/// Backend whose writes can be switched off
struct FlakyStore {
    inner: Arc<MemoryStore>,
    failing: Arc<AtomicBool>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: format!("{}.dat", key).into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }
}

#[test]
fn test_conflict_scenario() {
    let local = vec![q("Be kind", "A")];
    let remote = vec![q("Be kind", "B")];

    let conflicts = detect_conflicts(&local, &remote);
    assert_eq!(conflicts.len(), 1);

    let resolution = resolve_conflicts(&conflicts, local, true);
    assert_eq!(resolution.collection, vec![q("Be kind", "B")]);
    assert_eq!(resolution.resolved, 1);
}

#[test]
fn test_merge_scenario() {
    let local = vec![q("X", "A")];
    let remote = vec![q("X", "A"), q("Y", "B")];
    assert_eq!(merge(&local, &remote), vec![q("X", "A"), q("Y", "B")]);
}

#[test]
fn test_detect_counts_only_mismatches() {
    let local = vec![q("A", "1"), q("B", "2"), q("C", "3")];
    let remote = vec![q("A", "9"), q("B", "2"), q("C", "8"), q("D", "4")];

    let conflicts = detect_conflicts(&local, &remote);
    let texts: Vec<_> = conflicts.iter().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["A", "C"]);
}

#[tokio::test]
async fn test_sync_resolves_conflict_end_to_end() {
    let remote = Arc::new(StaticRemote::new(vec![q("Be kind", "B"), q("New", "N")]));
    let (coordinator, sink) = coordinator_with(vec![q("Be kind", "A")], remote);

    let report = match coordinator.trigger_sync().await {
        SyncTrigger::Completed(report) => report,
        other => panic!("expected completed sync, got {:?}", other),
    };
    assert_eq!(report.conflicts_found, 1);
    assert_eq!(report.conflicts_resolved, 1);
    assert_eq!(report.quotes_added, 1);

    let store = coordinator.store();
    let store = store.lock().await;
    assert_eq!(store.quotes(), &[q("Be kind", "B"), q("New", "N")]);
    assert_eq!(store.last_sync(), Some(report.completed_at));

    let messages: Vec<_> = sink.notifications().into_iter().map(|(_, m)| m).collect();
    assert_eq!(
        messages,
        vec![
            "Syncing with server...",
            "Found 1 conflicts during sync",
            "Automatically resolved 1 conflicts.",
            "Sync completed! Added 1 new quotes from server.",
        ]
    );
}

#[tokio::test]
async fn test_sync_with_resolution_disabled_keeps_local() {
    let remote = Arc::new(StaticRemote::new(vec![q("Be kind", "B")]));
    let (coordinator, sink) = coordinator_with(vec![q("Be kind", "A")], remote);
    let coordinator = coordinator.with_conflict_resolution(false);

    let trigger = coordinator.trigger_sync().await;
    let report = trigger.report().unwrap();
    assert_eq!(report.conflicts_found, 1);
    assert_eq!(report.conflicts_resolved, 0);
    assert!(report.has_unresolved());

    assert_eq!(coordinator.store().lock().await.quotes(), &[q("Be kind", "A")]);
    assert!(sink
        .notifications_at(NotificationLevel::Warning)
        .contains(&"Conflict resolution is disabled. Conflicts not resolved.".to_string()));
}

#[tokio::test]
async fn test_concurrent_trigger_is_skipped() {
    let remote = Arc::new(GatedRemote::new(vec![q("Y", "B")]));
    let (coordinator, _sink) = coordinator_with(vec![q("X", "A")], remote.clone());

    let first = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.trigger_sync().await })
    };

    remote.entered.notified().await;
    assert_eq!(coordinator.phase(), SyncPhase::Fetching);

    let second = coordinator.trigger_sync().await;
    assert!(second.is_skipped());

    remote.release.notify_one();
    let first = first.await.unwrap();
    assert_eq!(first.report().unwrap().quotes_added, 1);

    assert_eq!(remote.lists.load(Ordering::SeqCst), 1);
    assert_eq!(coordinator.phase(), SyncPhase::Idle);

    let cycles = coordinator
        .recent_transitions()
        .iter()
        .filter(|t| t.to == SyncPhase::Fetching)
        .count();
    assert_eq!(cycles, 1);
}

#[tokio::test]
async fn test_confirm_resolution_blocked_during_sync() {
    let remote = Arc::new(GatedRemote::new(Vec::new()));
    let (coordinator, _sink) = coordinator_with(vec![q("X", "A")], remote.clone());

    let running = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.trigger_sync().await })
    };
    remote.entered.notified().await;

    let conflicts = detect_conflicts(&[q("X", "A")], &[q("X", "B")]);
    let result = coordinator.confirm_resolution(&conflicts).await;
    assert!(matches!(result, Err(SyncError::InProgress)));

    remote.release.notify_one();
    running.await.unwrap();
}

#[tokio::test]
async fn test_transport_failure_path() {
    let remote = Arc::new(StaticRemote::with_server_quotes());
    remote.set_failing(true);
    let (coordinator, sink) = coordinator_with(vec![q("X", "A")], remote);

    let trigger = coordinator.trigger_sync().await;
    assert!(matches!(trigger, SyncTrigger::Failed(ref m) if m.starts_with("Sync failed")));

    let phases: Vec<_> = coordinator
        .recent_transitions()
        .iter()
        .map(|t| (t.from, t.to))
        .collect();
    assert_eq!(
        phases,
        vec![
            (SyncPhase::Idle, SyncPhase::Fetching),
            (SyncPhase::Fetching, SyncPhase::Failed),
            (SyncPhase::Failed, SyncPhase::Idle),
        ]
    );

    assert!(coordinator.store().lock().await.last_sync().is_none());
    assert_eq!(sink.notifications_at(NotificationLevel::Error).len(), 1);
    assert_eq!(coordinator.store().lock().await.quotes(), &[q("X", "A")]);
}

#[tokio::test]
async fn test_failure_then_recovery() {
    let remote = Arc::new(StaticRemote::new(vec![q("Y", "B")]));
    remote.set_failing(true);
    let (coordinator, _sink) = coordinator_with(vec![q("X", "A")], remote.clone());

    assert!(matches!(coordinator.trigger_sync().await, SyncTrigger::Failed(_)));
    remote.set_failing(false);
    assert!(coordinator.trigger_sync().await.report().is_some());
    assert!(coordinator.store().lock().await.last_sync().is_some());
}

#[tokio::test]
async fn test_preview_then_confirm() {
    let remote = Arc::new(StaticRemote::new(vec![q("Be kind", "B"), q("Be bold", "C")]));
    let (coordinator, sink) = coordinator_with(
        vec![q("Be kind", "A"), q("Be bold", "D"), q("Stay", "E")],
        remote,
    );

    let conflicts = coordinator.preview_conflicts().await.unwrap();
    assert_eq!(conflicts.len(), 2);
    assert_eq!(coordinator.store().lock().await.quotes()[0].category, "A");

    let resolved = coordinator.confirm_resolution(&conflicts).await.unwrap();
    assert_eq!(resolved, 2);
    assert_eq!(
        coordinator.store().lock().await.quotes(),
        &[q("Be kind", "B"), q("Be bold", "C"), q("Stay", "E")]
    );

    // Applying the same list again finds nothing left to change
    assert_eq!(coordinator.confirm_resolution(&conflicts).await.unwrap(), 0);
    assert!(sink
        .notifications_at(NotificationLevel::Success)
        .contains(&"Manual conflict resolution completed!".to_string()));
}

#[tokio::test]
async fn test_preview_without_conflicts() {
    let remote = Arc::new(StaticRemote::new(vec![q("X", "A")]));
    let (coordinator, sink) = coordinator_with(vec![q("X", "A")], remote);

    assert!(coordinator.preview_conflicts().await.unwrap().is_empty());
    assert_eq!(
        sink.notifications_at(NotificationLevel::Success),
        vec!["No conflicts found!"]
    );
}

#[tokio::test]
async fn test_storage_failure_while_persisting() {
    let backend = Arc::new(MemoryStore::new());
    let failing = Arc::new(AtomicBool::new(false));
    let flaky = FlakyStore {
        inner: backend.clone(),
        failing: failing.clone(),
    };
    let mut store = QuoteStore::open(Box::new(flaky), Box::new(MemoryStore::new()));
    store.replace_all(vec![q("X", "A")]).unwrap();

    let sink = Arc::new(RecordingSink::new());
    let remote = Arc::new(StaticRemote::new(vec![q("Y", "B")]));
    let coordinator = SyncCoordinator::new(shared_store(store), remote, sink.clone());

    failing.store(true, Ordering::SeqCst);
    let trigger = coordinator.trigger_sync().await;
    assert!(
        matches!(trigger, SyncTrigger::Failed(ref m) if m.starts_with("Could not save quotes locally"))
    );

    let phases: Vec<_> = coordinator
        .recent_transitions()
        .iter()
        .map(|t| t.to)
        .collect();
    assert_eq!(
        phases,
        vec![
            SyncPhase::Fetching,
            SyncPhase::Reconciling,
            SyncPhase::Persisting,
            SyncPhase::Failed,
            SyncPhase::Idle,
        ]
    );
    assert_eq!(sink.notifications_at(NotificationLevel::Error).len(), 1);
    assert!(sink.notifications_at(NotificationLevel::Success).is_empty());

    // The merged collection stays in memory for the session; nothing reached the backend
    {
        let store = coordinator.store();
        let store = store.lock().await;
        assert_eq!(store.quotes(), &[q("X", "A"), q("Y", "B")]);
        assert!(store.last_sync().is_none());
    }
    assert!(!backend.get(QUOTES_KEY).unwrap().unwrap().contains("\"Y\""));

    // The next successful cycle writes the kept quotes and stamps the time
    failing.store(false, Ordering::SeqCst);
    let report = coordinator.trigger_sync().await;
    let report = report.report().unwrap();
    assert_eq!(report.quotes_added, 0);
    assert!(backend.get(QUOTES_KEY).unwrap().unwrap().contains("\"Y\""));
    assert_eq!(
        coordinator.store().lock().await.last_sync(),
        Some(report.completed_at)
    );
}

#[tokio::test]
async fn test_duplicate_local_text_resolves_once() {
    let remote = Arc::new(StaticRemote::new(vec![q("X", "B")]));
    let (coordinator, _sink) = coordinator_with(vec![q("X", "B"), q("X", "A")], remote);

    let first = coordinator.trigger_sync().await;
    let first = first.report().unwrap();
    assert_eq!(first.conflicts_found, 1);
    assert_eq!(first.conflicts_resolved, 1);

    let second = coordinator.trigger_sync().await;
    assert_eq!(second.report().unwrap().conflicts_found, 0);
}
