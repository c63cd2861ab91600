// FILE: crates/cli/src/app.rs

use crate::sink::ConsoleSink;
use anyhow::{Context, Result};
use quotesync_config::{Config, ConfigManager};
use quotesync_network::{ClientConfig, HttpRemote};
use quotesync_store::{FileStore, MemoryStore, QuoteStore};
use quotesync_sync_engine::{
    log_failure, shared_store, ActionDelays, NotificationLevel, PresentationSink, QuoteService,
    RemoteService, ScheduleConfig, StaticRemote, SyncCoordinator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs, wired from the loaded configuration
pub struct App {
    pub config: Config,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub service: QuoteService,
}

/// Options taken from global command-line flags
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub config_dir: Option<PathBuf>,
    pub no_resolve: bool,
    pub verbose_sink: bool,
}

pub fn config_manager(config_dir: Option<&Path>) -> Result<ConfigManager> {
    let manager = match config_dir {
        Some(dir) => ConfigManager::with_directory(dir.to_path_buf()),
        None => ConfigManager::new(),
    };
    manager.context("Failed to locate config directory")
}

impl App {
    /// Opens the local store and connects the sync coordinator
    pub fn open(manager: &ConfigManager, config: Config, options: &AppOptions) -> Result<Self> {
        let data_dir = manager.data_dir(&config);
        let persistent = FileStore::open(data_dir.clone())
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

        let mut store = QuoteStore::open(Box::new(persistent), Box::new(MemoryStore::new()));
        let recovery = store.take_recovery_error();

        let sink: Arc<dyn PresentationSink> = if options.verbose_sink {
            Arc::new(ConsoleSink::verbose())
        } else {
            Arc::new(ConsoleSink::new())
        };
        if let Some(err) = recovery {
            log_failure("Loading stored quotes", &err.classify());
            sink.show_notification(&err.user_message(), NotificationLevel::Error);
        }

        let remote = build_remote(&config)?;
        let resolve = config.sync.conflict_resolution && !options.no_resolve;
        let coordinator = SyncCoordinator::new(shared_store(store), remote, sink)
            .with_conflict_resolution(resolve);

        Ok(Self {
            config_path: manager.config_path(),
            data_dir,
            service: QuoteService::new(coordinator),
            config,
        })
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        self.service.coordinator()
    }

    pub fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            startup_delay: self.config.sync.startup_delay(),
            interval: self.config.sync.interval(),
        }
    }

    pub fn delays(&self) -> ActionDelays {
        ActionDelays {
            after_add: self.config.sync.after_add_delay(),
            after_import: self.config.sync.after_import_delay(),
        }
    }
}

/// HTTP remote when an endpoint is configured, otherwise the built-in mock
pub fn build_remote(config: &Config) -> Result<Arc<dyn RemoteService>> {
    match &config.remote.endpoint {
        Some(endpoint) => {
            let client = ClientConfig {
                timeout: config.remote.timeout(),
                user_agent: config.remote.user_agent.clone(),
                ..ClientConfig::default()
            };
            let remote = HttpRemote::new(endpoint, client)
                .with_context(|| format!("Invalid remote endpoint '{}'", endpoint))?;
            Ok(Arc::new(remote))
        }
        None => {
            log::debug!("No remote endpoint configured, using built-in server quotes");
            Ok(Arc::new(StaticRemote::with_server_quotes()))
        }
    }
}
