// crates/sync-engine/src/presentation.rs
//! Presentation sink: where the core pushes render commands

use chrono::{DateTime, Utc};
use quotesync_core::Quote;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// Severity of a user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Receives render commands from the sync coordinator and the user actions
///
/// Implementations must not block; they are called while local state is
/// locked.
pub trait PresentationSink: Send + Sync {
    /// Renders a quote with a context line such as "Total quotes: 6"
    fn show_quote(&self, quote: &Quote, context: &str);

    /// Renders the "nothing to show" state
    fn show_empty_state(&self);

    /// Shows a transient notification
    fn show_notification(&self, message: &str, level: NotificationLevel);

    /// Refreshes the category selector
    fn update_category_options(&self, categories: &[String], selected: &str);

    /// Refreshes the "last sync" indicator
    fn update_sync_status(&self, last_sync: Option<DateTime<Utc>>);
}

/// A render command as captured by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    Quote { quote: Quote, context: String },
    EmptyState,
    Notification { message: String, level: NotificationLevel },
    CategoryOptions { categories: Vec<String>, selected: String },
    SyncStatus(Option<DateTime<Utc>>),
}

/// Sink that records every command, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<RenderCommand>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Drains the recorded commands
    pub fn take(&self) -> Vec<RenderCommand> {
        self.commands
            .lock()
            .map(|mut c| std::mem::take(&mut *c))
            .unwrap_or_default()
    }

    /// Returns recorded notifications in order
    pub fn notifications(&self) -> Vec<(NotificationLevel, String)> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                RenderCommand::Notification { message, level } => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    /// Returns the messages of notifications at `level`
    pub fn notifications_at(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// Returns the most recently shown quote and its context line
    pub fn last_quote(&self) -> Option<(Quote, String)> {
        self.commands().into_iter().rev().find_map(|command| match command {
            RenderCommand::Quote { quote, context } => Some((quote, context)),
            _ => None,
        })
    }

    fn push(&self, command: RenderCommand) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }
}

impl PresentationSink for RecordingSink {
    fn show_quote(&self, quote: &Quote, context: &str) {
        self.push(RenderCommand::Quote {
            quote: quote.clone(),
            context: context.to_string(),
        });
    }

    fn show_empty_state(&self) {
        self.push(RenderCommand::EmptyState);
    }

    fn show_notification(&self, message: &str, level: NotificationLevel) {
        self.push(RenderCommand::Notification {
            message: message.to_string(),
            level,
        });
    }

    fn update_category_options(&self, categories: &[String], selected: &str) {
        self.push(RenderCommand::CategoryOptions {
            categories: categories.to_vec(),
            selected: selected.to_string(),
        });
    }

    fn update_sync_status(&self, last_sync: Option<DateTime<Utc>>) {
        self.push(RenderCommand::SyncStatus(last_sync));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_filters_notifications() {
        let sink = RecordingSink::new();
        sink.show_notification("Syncing with server...", NotificationLevel::Info);
        sink.show_empty_state();
        sink.show_notification("boom", NotificationLevel::Error);

        assert_eq!(sink.notifications().len(), 2);
        assert_eq!(sink.notifications_at(NotificationLevel::Error), vec!["boom"]);
        assert_eq!(sink.take().len(), 3);
        assert!(sink.commands().is_empty());
    }

    #[test]
    fn test_last_quote() {
        let sink = RecordingSink::new();
        assert!(sink.last_quote().is_none());

        sink.show_quote(&Quote::new("a", "x"), "Total quotes: 1");
        sink.show_quote(&Quote::new("b", "y"), "Total quotes: 2");
        let (quote, context) = sink.last_quote().unwrap();
        assert_eq!(quote.text, "b");
        assert_eq!(context, "Total quotes: 2");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(NotificationLevel::Warning.to_string(), "warning");
    }
}
