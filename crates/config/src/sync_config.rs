//! Sync scheduling configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and policy for background synchronization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between periodic sync cycles
    pub interval_secs: u64,

    /// Delay before the first sync after startup, in milliseconds
    pub startup_delay_ms: u64,

    /// Delay before the sync that follows a local add, in milliseconds
    pub after_add_delay_ms: u64,

    /// Delay before the sync that follows an import, in milliseconds
    pub after_import_delay_ms: u64,

    /// Resolve category conflicts automatically (remote wins)
    pub conflict_resolution: bool,
}

impl SyncConfig {
    /// Periodic sync interval
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Delay before the startup sync
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Delay before the sync following a local add
    pub fn after_add_delay(&self) -> Duration {
        Duration::from_millis(self.after_add_delay_ms)
    }

    /// Delay before the sync following an import
    pub fn after_import_delay(&self) -> Duration {
        Duration::from_millis(self.after_import_delay_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            startup_delay_ms: 2_000,
            after_add_delay_ms: 1_000,
            after_import_delay_ms: 1_500,
            conflict_resolution: true,
        }
    }
}

impl ConfigSection for SyncConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::in_range(self.interval_secs, 1, 86_400, "sync.interval_secs"),
            Validator::in_range(self.startup_delay_ms, 0, 600_000, "sync.startup_delay_ms"),
            Validator::in_range(self.after_add_delay_ms, 0, 600_000, "sync.after_add_delay_ms"),
            Validator::in_range(
                self.after_import_delay_ms,
                0,
                600_000,
                "sync.after_import_delay_ms",
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.interval_secs = other.interval_secs;
        self.startup_delay_ms = other.startup_delay_ms;
        self.after_add_delay_ms = other.after_add_delay_ms;
        self.after_import_delay_ms = other.after_import_delay_ms;
        self.conflict_resolution = other.conflict_resolution;
    }

    fn section_name(&self) -> &'static str {
        "sync"
    }
}
