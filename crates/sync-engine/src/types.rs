// crates/sync-engine/src/types.rs
//! Core sync types and data structures

use chrono::{DateTime, Utc};
use quotesync_core::Quote;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a local and a remote quote disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Same text, different category
    CategoryMismatch,
}

/// A detected disagreement between a local and a remote quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// The local quote as it was when the conflict was detected
    pub local: Quote,
    /// The remote quote that disagrees with it
    pub remote: Quote,
    /// Kind of disagreement
    pub kind: ConflictKind,
}

impl Conflict {
    /// Creates a category mismatch conflict
    pub fn category_mismatch(local: Quote, remote: Quote) -> Self {
        Self {
            local,
            remote,
            kind: ConflictKind::CategoryMismatch,
        }
    }

    /// Returns the quote text both sides share
    pub fn text(&self) -> &str {
        &self.remote.text
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" (local: {}, server: {})",
            self.local.text, self.local.category, self.remote.category
        )
    }
}

/// Output of the resolution policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The collection after resolution was applied
    pub collection: Vec<Quote>,
    /// Number of conflicts whose local quote was found and updated
    pub resolved: usize,
}

/// Phase of the sync state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    /// Nothing running
    Idle,
    /// Waiting for the remote collection
    Fetching,
    /// Detecting, resolving and merging
    Reconciling,
    /// Writing the result to the store
    Persisting,
    /// The cycle was abandoned
    Failed,
}

impl SyncPhase {
    /// Returns true while a cycle holds the in-flight guard
    ///
    /// `Failed` is held only until the failing cycle hands back to `Idle`,
    /// so it counts as busy too.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Reconciling => "reconciling",
            Self::Persisting => "persisting",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A recorded state machine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: SyncPhase,
    pub to: SyncPhase,
    pub at: DateTime<Utc>,
}

/// Outcome of a completed sync cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Conflicts detected between local and remote
    pub conflicts_found: usize,
    /// Conflicts the resolution policy applied
    pub conflicts_resolved: usize,
    /// Whether automatic resolution was enabled for this cycle
    pub resolution_enabled: bool,
    /// Remote-only quotes appended by the merge
    pub quotes_added: usize,
    /// When the cycle finished
    pub completed_at: DateTime<Utc>,
}

impl SyncReport {
    /// Returns true if conflicts were found but left unresolved
    pub fn has_unresolved(&self) -> bool {
        self.conflicts_resolved < self.conflicts_found
    }
}

/// What happened when a sync was triggered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTrigger {
    /// A full cycle ran
    Completed(SyncReport),
    /// The cycle was abandoned; the message was shown to the user
    Failed(String),
    /// Another cycle was already in flight
    Skipped,
}

impl SyncTrigger {
    /// Returns the report of a completed cycle
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let conflict = Conflict::category_mismatch(
            Quote::new("Be kind", "A"),
            Quote::new("Be kind", "B"),
        );
        assert_eq!(conflict.to_string(), "\"Be kind\" (local: A, server: B)");
        assert_eq!(conflict.text(), "Be kind");
        assert_eq!(conflict.kind, ConflictKind::CategoryMismatch);
    }

    #[test]
    fn test_busy_phases() {
        assert!(!SyncPhase::Idle.is_busy());
        assert!(SyncPhase::Fetching.is_busy());
        assert!(SyncPhase::Reconciling.is_busy());
        assert!(SyncPhase::Persisting.is_busy());
        assert!(SyncPhase::Failed.is_busy());
    }

    #[test]
    fn test_report_unresolved() {
        let report = SyncReport {
            conflicts_found: 2,
            conflicts_resolved: 0,
            resolution_enabled: false,
            quotes_added: 0,
            completed_at: Utc::now(),
        };
        assert!(report.has_unresolved());
        assert!(SyncTrigger::Completed(report).report().is_some());
        assert!(SyncTrigger::Skipped.report().is_none());
    }
}
