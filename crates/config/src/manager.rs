//! Configuration manager - main API for config operations

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration manager
///
/// Owns the config directory, which is also the base for relative storage paths.
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager using the default config directory
    ///
    /// - Linux: `~/.config/quotesync/`
    /// - macOS: `~/Library/Application Support/quotesync/`
    /// - Windows: `%APPDATA%\quotesync\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::with_directory(config_dir)
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        let persistence = ConfigPersistence::new(config_dir.join(CONFIG_FILE_NAME));

        Ok(Self {
            persistence,
            config_dir,
        })
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "quotesync")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the config directory path
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    /// Returns the full config file path
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Returns the resolved data directory for a loaded config
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config.storage.resolve_data_dir(&self.config_dir)
    }

    /// Loads the configuration from file
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Saves the configuration to file
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, applies `update_fn` and saves atomically
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a default config file if one doesn't exist
    ///
    /// Returns Ok(true) if a new file was created, Ok(false) if one already exists.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            return Ok(false);
        }

        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    /// Loads the config (or defaults) and applies environment overrides
    ///
    /// Recognised variables:
    /// `QUOTESYNC_SYNC_INTERVAL_SECS`, `QUOTESYNC_REMOTE_ENDPOINT`,
    /// `QUOTESYNC_APP_LOG_LEVEL`, `QUOTESYNC_STORAGE_DATA_DIR`.
    pub fn load_with_env_overrides(&self) -> Config {
        let mut config = self.load_or_default();
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }

        config
    }
}

/// Applies overrides looked up through `lookup`
fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(interval) = lookup("QUOTESYNC_SYNC_INTERVAL_SECS") {
        match interval.trim().parse::<u64>() {
            Ok(secs) => config.sync.interval_secs = secs,
            Err(_) => log::warn!("Ignoring non-numeric QUOTESYNC_SYNC_INTERVAL_SECS={}", interval),
        }
    }

    if let Some(endpoint) = lookup("QUOTESYNC_REMOTE_ENDPOINT") {
        let endpoint = endpoint.trim();
        config.remote.endpoint = if endpoint.is_empty() {
            None
        } else {
            Some(endpoint.to_string())
        };
    }

    if let Some(level) = lookup("QUOTESYNC_APP_LOG_LEVEL") {
        match level.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring log level override: {}", e),
        }
    }

    if let Some(dir) = lookup("QUOTESYNC_STORAGE_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }
}
