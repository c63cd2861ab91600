//! Reading and writing `config.toml`
//!
//! Saves replace the file through a temp file in the same directory, keeping
//! the previous contents as `config.toml.backup`. Loads run the file through
//! [`migrate`] before it is decoded.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const VERSION_KEY: &str = "version";

pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Loads the config file
    ///
    /// A missing file yields defaults. An empty or malformed file is an
    /// error. Out-of-range values are only logged here; [`save`] refuses them.
    ///
    /// [`save`]: ConfigPersistence::save
    pub fn load(&self) -> ConfigResult<Config> {
        let Some(contents) = self.read()? else {
            log::info!(
                "No config at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        };

        let table: toml::Table = toml::from_str(&contents).map_err(|e| self.parse_error(e))?;
        let table = migrate(table)?;
        let config: Config = toml::Value::Table(table)
            .try_into()
            .map_err(|e| self.parse_error(e))?;

        if let Err(errors) = config.validate() {
            log::warn!("{}", ConfigError::Invalid(errors));
        }
        Ok(config)
    }

    /// Validates and writes the config atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        config.validate().map_err(ConfigError::Invalid)?;
        let encoded = toml::to_string_pretty(config)?;

        let dir = match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| ConfigError::Write {
            path: dir.clone(),
            source,
        })?;

        if self.config_path.exists() {
            let backup = self.config_path.with_extension("toml.backup");
            fs::copy(&self.config_path, &backup).map_err(|source| self.write_error(source))?;
            log::debug!("Previous config kept at {}", backup.display());
        }

        let mut temp = NamedTempFile::new_in(&dir).map_err(|source| self.write_error(source))?;
        temp.write_all(encoded.as_bytes())
            .and_then(|()| temp.flush())
            .map_err(|source| self.write_error(source))?;
        temp.persist(&self.config_path)
            .map_err(|e| self.write_error(e.error))?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }

    /// Returns the file contents, or None if there is no file
    fn read(&self) -> ConfigResult<Option<String>> {
        if !self.config_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.config_path).map_err(|source| {
            ConfigError::Read {
                path: self.config_path.clone(),
                source,
            }
        })?;

        if contents.trim().is_empty() {
            return Err(ConfigError::Read {
                path: self.config_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "config file is empty",
                ),
            });
        }
        Ok(Some(contents))
    }

    fn parse_error(&self, source: toml::de::Error) -> ConfigError {
        ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Write {
            path: self.config_path.clone(),
            source,
        }
    }
}

/// Brings a config table written by an older release up to [`CONFIG_VERSION`]
///
/// Files without a `version` key predate versioning and are treated as 0.
fn migrate(mut table: toml::Table) -> ConfigResult<toml::Table> {
    let found = match table.get(VERSION_KEY) {
        Some(toml::Value::Integer(v)) => u32::try_from(*v).unwrap_or(u32::MAX),
        _ => 0,
    };

    if found > CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found,
            supported: CONFIG_VERSION,
        });
    }

    if found < CONFIG_VERSION {
        // Version 0 -> 1 only introduced the version key itself
        log::info!("Migrating config from version {} to {}", found, CONFIG_VERSION);
        table.insert(
            VERSION_KEY.to_string(),
            toml::Value::Integer(i64::from(CONFIG_VERSION)),
        );
    }
    Ok(table)
}
