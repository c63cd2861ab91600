// FILE: crates/cli/src/main.rs

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use quotesync_config::LogLevel;
use std::path::PathBuf;

mod app;
mod commands;
mod sink;

use app::{config_manager, App, AppOptions};

fn build_cli() -> Command {
    Command::new("quotesync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Quote collection with background sync to a quote server")
        .arg(
            Arg::new("config-dir")
                .short('c')
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml (and data, unless configured otherwise)")
                .global(true),
        )
        .arg(
            Arg::new("no-resolve")
                .long("no-resolve")
                .help("Keep local categories when they conflict with the server")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("show")
                .about("Show a random quote")
                .arg(
                    Arg::new("category")
                        .short('C')
                        .long("category")
                        .value_name("CATEGORY")
                        .help("Switch to this category first"),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a new quote")
                .arg(Arg::new("text").required(true).value_name("TEXT").help("Quote text"))
                .arg(Arg::new("category").required(true).value_name("CATEGORY").help("Quote category"))
                .arg(
                    Arg::new("sync")
                        .short('s')
                        .long("sync")
                        .help("Sync with the server afterwards")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("categories").about("List categories"))
        .subcommand(
            Command::new("filter")
                .about("Set the category filter ('all' for every quote)")
                .arg(Arg::new("category").required(true).value_name("CATEGORY")),
        )
        .subcommand(
            Command::new("export")
                .about("Export quotes as JSON")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output file path, '-' for stdout")
                        .default_value("quotes.json"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import quotes from a JSON file")
                .arg(Arg::new("file").required(true).value_name("FILE").help("JSON array of quotes")),
        )
        .subcommand(Command::new("sync").about("Sync with the server now"))
        .subcommand(
            Command::new("conflicts")
                .about("Show categories that differ from the server")
                .arg(
                    Arg::new("resolve")
                        .short('r')
                        .long("resolve")
                        .help("Accept the server's categories")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("resolution")
                .about("Turn automatic conflict resolution on or off and remember it")
                .arg(
                    Arg::new("state")
                        .required(true)
                        .value_name("STATE")
                        .value_parser(["on", "off", "toggle"]),
                ),
        )
        .subcommand(Command::new("status").about("Show collection and sync status"))
        .subcommand(Command::new("watch").about("Keep syncing in the background until Ctrl-C"))
}

fn app_options(matches: &ArgMatches) -> AppOptions {
    AppOptions {
        config_dir: matches.get_one::<String>("config-dir").map(PathBuf::from),
        no_resolve: matches.get_flag("no-resolve"),
        verbose_sink: matches.subcommand_name() == Some("watch"),
    }
}

/// Maps the configured level onto the `log` facade
fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Installs the logger before the config is read
///
/// Without `RUST_LOG` the filter is opened fully and the effective level is
/// capped at `info` until [`apply_log_level`] sees the configured one.
fn init_logging() -> bool {
    let from_env = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace")).init();
    if !from_env {
        log::set_max_level(LevelFilter::Info);
    }
    from_env
}

fn apply_log_level(level: LogLevel, from_env: bool) {
    if !from_env {
        log::set_max_level(level_filter(level));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let options = app_options(&matches);
    let log_from_env = init_logging();

    let manager = config_manager(options.config_dir.as_deref())?;
    let config = manager.load_with_env_overrides();
    apply_log_level(config.app.log_level, log_from_env);

    if let Err(e) = manager.initialize() {
        log::warn!("Could not write default config: {}", e);
    }

    let app = App::open(&manager, config, &options)?;

    match matches.subcommand() {
        Some(("show", sub_matches)) => {
            let category = sub_matches.get_one::<String>("category");
            commands::show_quote(&app, category.map(String::as_str)).await
        }
        Some(("add", sub_matches)) => commands::add_quote(&app, sub_matches).await,
        Some(("categories", _)) => commands::list_categories(&app).await,
        Some(("filter", sub_matches)) => commands::set_filter(&app, sub_matches).await,
        Some(("export", sub_matches)) => commands::export_quotes(&app, sub_matches).await,
        Some(("import", sub_matches)) => commands::import_quotes(&app, sub_matches).await,
        Some(("sync", _)) => commands::sync_now(&app).await,
        Some(("conflicts", sub_matches)) => commands::show_conflicts(&app, sub_matches).await,
        Some(("status", _)) => commands::show_status(&app).await,
        Some(("resolution", sub_matches)) => {
            commands::set_resolution(&app, &manager, sub_matches)
        }
        Some(("watch", _)) => commands::watch(app).await,
        _ => commands::show_quote(&app, None).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(level_filter(LogLevel::Trace), LevelFilter::Trace);
    }

    #[test]
    fn test_cli_definition() {
        build_cli().debug_assert();
    }
}
