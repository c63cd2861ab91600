// FILE: crates/cli/src/commands.rs

use crate::app::App;
use crate::sink::{format_categories, format_sync_status};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use quotesync_config::ConfigManager;
use quotesync_sync_engine::{Conflict, SyncScheduler, SyncTrigger};
use std::path::Path;

/// Show a random quote, switching category first if one is given
pub async fn show_quote(app: &App, category: Option<&str>) -> Result<()> {
    match category {
        Some(category) => {
            app.service.select_filter(category).await?;
        }
        None => {
            app.service.restore_view().await;
        }
    }
    Ok(())
}

/// Add a quote, optionally syncing right away
pub async fn add_quote(app: &App, matches: &ArgMatches) -> Result<()> {
    let text = matches
        .get_one::<String>("text")
        .ok_or_else(|| anyhow::anyhow!("Quote text is required"))?;
    let category = matches
        .get_one::<String>("category")
        .ok_or_else(|| anyhow::anyhow!("Category is required"))?;

    // Rejections are already shown to the user by the service
    if app.service.add_quote(text, category).await.is_err() {
        bail!("Quote was not added");
    }

    if matches.get_flag("sync") {
        run_sync(app).await?;
    }
    Ok(())
}

/// List the category options
pub async fn list_categories(app: &App) -> Result<()> {
    let categories = app.service.categories().await;
    let store = app.coordinator().store();
    let store = store.lock().await;
    let selected = store.filter().as_str().to_string();
    drop(store);

    println!("{}", format_categories(&categories, &selected));
    Ok(())
}

/// Set the current category filter
pub async fn set_filter(app: &App, matches: &ArgMatches) -> Result<()> {
    let category = matches
        .get_one::<String>("category")
        .ok_or_else(|| anyhow::anyhow!("Category is required"))?;

    let categories = app.service.categories().await;
    if !categories.iter().any(|c| c == category) {
        println!(
            "{} No quotes in category '{}' yet",
            style("!").yellow().bold(),
            category
        );
    }

    app.service.select_filter(category.as_str()).await?;
    Ok(())
}

/// Export all quotes as JSON; `-` writes to stdout
pub async fn export_quotes(app: &App, matches: &ArgMatches) -> Result<()> {
    let output = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("quotes.json");

    let Ok(json) = app.service.export_json().await else {
        return Ok(());
    };

    if output == "-" {
        println!("{}", json);
    } else {
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write export file {}", output))?;
        println!("Written to {}", output);
    }
    Ok(())
}

/// Import quotes from a JSON file
pub async fn import_quotes(app: &App, matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| anyhow::anyhow!("File path is required"))?;

    let json = read_import_file(Path::new(file))?;
    if app.service.import_json(&json).await.is_err() {
        bail!("Nothing was imported from {}", file);
    }
    Ok(())
}

/// Run one sync cycle now
pub async fn sync_now(app: &App) -> Result<()> {
    run_sync(app).await
}

/// Preview conflicts with the server, resolving them if asked
pub async fn show_conflicts(app: &App, matches: &ArgMatches) -> Result<()> {
    let Ok(conflicts) = app.coordinator().preview_conflicts().await else {
        bail!("Could not reach the quote server");
    };
    if conflicts.is_empty() {
        return Ok(());
    }

    println!("\n{} Conflicts", style(conflicts.len()).bold().yellow());
    println!("{}", "=".repeat(60));
    for conflict in &conflicts {
        print_conflict(conflict);
    }
    println!();

    if matches.get_flag("resolve") {
        let resolved = app
            .coordinator()
            .confirm_resolution(&conflicts)
            .await
            .context("Failed to resolve conflicts")?;
        println!("Resolved {} of {} conflicts", resolved, conflicts.len());
    } else {
        println!("Run with --resolve to accept the server's categories.");
    }
    Ok(())
}

/// Set or flip automatic conflict resolution, and save the choice
pub fn set_resolution(app: &App, manager: &ConfigManager, matches: &ArgMatches) -> Result<()> {
    let state = matches
        .get_one::<String>("state")
        .map(String::as_str)
        .unwrap_or("toggle");

    let coordinator = app.coordinator();
    let enabled = match state {
        "toggle" => coordinator.toggle_conflict_resolution(),
        state => {
            let enabled = state == "on";
            coordinator.set_conflict_resolution(enabled);
            enabled
        }
    };

    manager
        .update(|config| config.sync.conflict_resolution = enabled)
        .context("Failed to save the resolution setting")?;
    println!("Automatic conflict resolution is {}", on_off(enabled));
    Ok(())
}

/// Show collection and sync state
pub async fn show_status(app: &App) -> Result<()> {
    let store = app.coordinator().store();
    let store = store.lock().await;

    println!("\n{}", style("QuoteSync Status").bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  Quotes:       {}", store.len());
    println!("  Categories:   {}", store.categories().len().saturating_sub(1));
    println!("  Filter:       {}", store.filter());
    println!("  {}", format_sync_status(store.last_sync()));
    drop(store);

    let endpoint = app
        .config
        .remote
        .endpoint
        .as_deref()
        .unwrap_or("built-in server quotes");
    println!("  Server:       {}", endpoint);
    println!(
        "  Resolution:   {}",
        on_off(app.coordinator().conflict_resolution_enabled())
    );
    println!("  Sync every:   {}", format_interval(app.config.sync.interval_secs));
    println!("  Config:       {}", app.config_path.display());
    println!("  Data:         {}", app.data_dir.display());
    Ok(())
}

/// Show quotes and keep syncing in the background until Ctrl-C
pub async fn watch(app: App) -> Result<()> {
    let schedule = app.schedule();
    let delays = app.delays();
    let (scheduler, handle) = SyncScheduler::new(app.coordinator().clone(), schedule);
    let service = app.service.with_scheduler(handle.clone(), delays);

    service.restore_view().await;
    let task = scheduler.spawn();

    println!(
        "Watching for changes, syncing every {}. Press Ctrl-C to stop.",
        format_interval(app.config.sync.interval_secs)
    );
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    handle.shutdown();
    task.await.context("Sync scheduler panicked")?;
    println!("Stopped.");
    Ok(())
}

async fn run_sync(app: &App) -> Result<()> {
    match app.coordinator().trigger_sync().await {
        SyncTrigger::Completed(report) => {
            if report.has_unresolved() {
                println!(
                    "{} conflicts left unresolved. See 'quotesync conflicts'.",
                    report.conflicts_found - report.conflicts_resolved
                );
            }
            Ok(())
        }
        SyncTrigger::Failed(message) => bail!(message),
        SyncTrigger::Skipped => Ok(()),
    }
}

fn read_import_file(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file {}", path.display()))
}

fn print_conflict(conflict: &Conflict) {
    println!("\n  {}", style(format!("\"{}\"", conflict.text())).bold());
    println!(
        "  local: {}  server: {}",
        style(&conflict.local.category).red(),
        style(&conflict.remote.category).green()
    );
}

fn format_interval(seconds: u64) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    match (minutes, rest) {
        (0, s) => format!("{}s", s),
        (m, 0) => format!("{}m", m),
        (m, s) => format!("{}m {}s", m, s),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
