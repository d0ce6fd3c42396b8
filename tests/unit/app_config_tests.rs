/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use lexis::app_config::{Config, LogLevel};
use lexis::SchemaOverride;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.search.debounce(), Duration::from_millis(300));
    assert_eq!(config.audio.gap(), Duration::from_millis(200));
    assert_eq!(config.audio.player[0], "ffplay");
    assert!(config.schema.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withPartialOverride_shouldFail() {
    let mut config = Config::default();
    config.schema = SchemaOverride {
        table: Some("words".to_string()),
        term_column: Some("word".to_string()),
        ..Default::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withEmptyPlayer_shouldFail() {
    let mut config = Config::default();
    config.audio.player.clear();

    assert!(config.validate().is_err());
}

#[test]
fn test_config_deserialize_withMissingSections_shouldUseDefaults() {
    let config: Config = serde_json::from_str(
        r#"{ "database_path": "/tmp/dict.db", "log_level": "debug", "search": {} }"#,
    )
    .unwrap();

    assert_eq!(config.database_path.to_string_lossy(), "/tmp/dict.db");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.search.debounce_ms, 300);
    assert_eq!(config.audio.gap_ms, 200);
    assert_eq!(config.audio_base_dir().unwrap().to_string_lossy(), "/tmp");
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexis.json");

    let (_, created) = Config::load_or_create(&path).unwrap();
    assert!(created);
    assert!(path.exists());

    let (reloaded, created_again) = Config::load_or_create(&path).unwrap();
    assert!(!created_again);
    assert_eq!(reloaded.audio.gap_ms, 200);
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
}
