// FILE: crates/cli/src/sink.rs

use chrono::{DateTime, Local, Utc};
use console::style;
use quotesync_core::Quote;
use quotesync_sync_engine::{NotificationLevel, PresentationSink};

/// Renders presentation commands on the terminal
///
/// Quotes go to stdout, notifications to stderr. Category and sync-status
/// updates are only printed in verbose mode (`watch`); one-shot commands
/// report those themselves.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl PresentationSink for ConsoleSink {
    fn show_quote(&self, quote: &Quote, context: &str) {
        println!("\n  {}", style(format!("\"{}\"", quote.text)).bold());
        println!("  {}", style(format!("- {}", quote.category)).cyan());
        if !context.is_empty() {
            println!("  {}", style(context).dim());
        }
        println!();
    }

    fn show_empty_state(&self) {
        println!("No quotes available. Add some quotes first!");
    }

    fn show_notification(&self, message: &str, level: NotificationLevel) {
        eprintln!("{}", format_notification(message, level));
    }

    fn update_category_options(&self, categories: &[String], selected: &str) {
        if self.verbose {
            eprintln!("{}", style(format_categories(categories, selected)).dim());
        } else {
            log::debug!("Categories: {:?} (selected '{}')", categories, selected);
        }
    }

    fn update_sync_status(&self, last_sync: Option<DateTime<Utc>>) {
        if self.verbose {
            eprintln!("{}", style(format_sync_status(last_sync)).dim());
        } else {
            log::debug!("{}", format_sync_status(last_sync));
        }
    }
}

pub fn format_notification(message: &str, level: NotificationLevel) -> String {
    match level {
        NotificationLevel::Success => format!("{} {}", style("✓").green().bold(), message),
        NotificationLevel::Error => format!("{} {}", style("✗").red().bold(), message),
        NotificationLevel::Warning => format!("{} {}", style("!").yellow().bold(), message),
        NotificationLevel::Info => format!("{} {}", style("•").blue(), message),
    }
}

pub fn format_sync_status(last_sync: Option<DateTime<Utc>>) -> String {
    match last_sync {
        Some(at) => format!(
            "Last sync: {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => "Last sync: never".to_string(),
    }
}

/// One line listing the categories, the selected one in brackets
pub fn format_categories(categories: &[String], selected: &str) -> String {
    let items: Vec<String> = categories
        .iter()
        .map(|c| {
            if c == selected {
                format!("[{}]", c)
            } else {
                c.clone()
            }
        })
        .collect();
    format!("Categories: {}", items.join(", "))
}
