//! Integration tests for the configuration system

use quotesync_config::{Config, ConfigManager, ConfigSection, SyncConfig, CONFIG_VERSION};
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    assert!(manager.initialize()?);

    let config = manager.load()?;
    assert_eq!(config.version, CONFIG_VERSION);

    let mut modified = config.clone();
    modified.sync.interval_secs = 60;
    modified.remote.endpoint = Some("https://quotes.example.com/api/quotes".to_string());
    manager.save(&modified)?;

    let reloaded = manager.load()?;
    assert_eq!(reloaded.sync.interval_secs, 60);
    assert_eq!(
        reloaded.remote.endpoint.as_deref(),
        Some("https://quotes.example.com/api/quotes")
    );

    Ok(())
}

#[test]
fn test_invalid_config_not_saved() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let mut invalid = Config::default();
    invalid.remote.endpoint = Some("quotes.example.com".to_string());
    assert!(manager.save(&invalid).is_err());

    // The earlier valid file is still intact
    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_hand_written_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    std::fs::write(
        manager.config_path(),
        r#"
version = 1

[app]
log_level = "debug"

[sync]
interval_secs = 10
conflict_resolution = false
"#,
    )?;

    let config = manager.load()?;
    assert_eq!(config.app.log_level.to_string(), "debug");
    assert_eq!(config.sync.interval_secs, 10);
    assert!(!config.sync.conflict_resolution);
    assert_eq!(config.sync.after_add_delay_ms, SyncConfig::default().after_add_delay_ms);
    Ok(())
}

#[test]
fn test_section_names() {
    let config = Config::default();
    assert_eq!(config.app.section_name(), "app");
    assert_eq!(config.sync.section_name(), "sync");
    assert_eq!(config.storage.section_name(), "storage");
    assert_eq!(config.remote.section_name(), "remote");
}
