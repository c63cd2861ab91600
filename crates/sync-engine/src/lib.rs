// crates/sync-engine/src/lib.rs
//! Quote synchronization engine
//!
//! Reconciles the local quote collection with a remote service:
//! - Conflict detection (same text, different category)
//! - Remote-wins conflict resolution, automatic or previewed and confirmed
//! - Merging of remote-only quotes
//! - A coordinator that allows one sync cycle at a time
//! - A scheduler for startup, periodic and deferred syncs
//!
//! # Example
//!
//! ```rust
//! use quotesync_store::{MemoryStore, QuoteStore};
//! use quotesync_sync_engine::{shared_store, RecordingSink, StaticRemote, SyncCoordinator};
//! use std::sync::Arc;
//!
//! let store = QuoteStore::open(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()));
//! let coordinator = SyncCoordinator::new(
//!     shared_store(store),
//!     Arc::new(StaticRemote::with_server_quotes()),
//!     Arc::new(RecordingSink::new()),
//! );
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let outcome = runtime.block_on(coordinator.trigger_sync());
//! assert_eq!(outcome.report().unwrap().quotes_added, 2);
//! ```

mod conflict;
mod engine;
mod error;
mod merge;
mod presentation;
mod remote;
mod scheduler;
mod service;
mod types;

pub use conflict::{detect_conflicts, resolve_conflicts};
pub use engine::{shared_store, SharedStore, SyncCoordinator};
pub use error::{log_failure, SyncError, SyncResult};
pub use merge::merge;
pub use presentation::{NotificationLevel, PresentationSink, RecordingSink, RenderCommand};
pub use remote::{server_quotes, RemoteService, StaticRemote};
pub use scheduler::{ScheduleConfig, SchedulerHandle, SyncScheduler};
pub use service::{ActionDelays, QuoteService};
pub use types::{
    Conflict, ConflictKind, PhaseTransition, Resolution, SyncPhase, SyncReport, SyncTrigger,
};
