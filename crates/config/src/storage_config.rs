//! Local storage configuration section

use crate::validation::{ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the persistent quote store lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory (relative to config dir if not absolute)
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Resolves `data_dir` against a base directory
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        if self.data_dir.is_absolute() {
            self.data_dir.clone()
        } else {
            base.join(&self.data_dir)
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ConfigSection for StorageConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(vec![ValidationError::new(
                "storage.data_dir",
                "must not be empty",
            )]);
        }
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        self.data_dir = other.data_dir;
    }

    fn section_name(&self) -> &'static str {
        "storage"
    }
}
