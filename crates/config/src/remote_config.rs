//! Remote quote service configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote quote service settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Quotes endpoint. `None` selects the built-in mock service.
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl RemoteConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
            user_agent: "QuoteSync/0.1".to_string(),
        }
    }
}

impl ConfigSection for RemoteConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::in_range(self.timeout_secs, 1, 300, "remote.timeout_secs"),
            Validator::not_empty(&self.user_agent, "remote.user_agent"),
        ];

        if let Some(endpoint) = &self.endpoint {
            results.push(Validator::http_url(endpoint, "remote.endpoint"));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.endpoint = other.endpoint;
        self.timeout_secs = other.timeout_secs;
        self.user_agent = other.user_agent;
    }

    fn section_name(&self) -> &'static str {
        "remote"
    }
}
