use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::database::{DatabaseConnection, SchemaOverride};

/// Application configuration module
/// This module handles loading, validating and saving the configuration:
/// where the dictionary lives, how its schema is bound, and presentation
/// timings for search and audio.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path to the SQLite dictionary
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Explicit schema binding, inferred from the store when empty
    #[serde(default)]
    pub schema: SchemaOverride,

    /// Search config
    #[serde(default)]
    pub search: SearchConfig,

    /// Audio config
    #[serde(default)]
    pub audio: AudioConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Search-as-you-type settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a query is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Audio playback settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AudioConfig {
    /// Pause after a finished entry before the next one starts
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,

    /// External player command; the resolved reference is appended
    #[serde(default = "default_player")]
    pub player: Vec<String>,

    /// Directory relative audio references are resolved against
    #[serde(default)]
    pub audio_dir: Option<PathBuf>,

    /// Longest a single entry may play
    #[serde(default = "default_play_timeout_secs")]
    pub play_timeout_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            gap_ms: default_gap_ms(),
            player: default_player(),
            audio_dir: None,
            play_timeout_secs: default_play_timeout_secs(),
        }
    }
}

impl AudioConfig {
    pub fn gap(&self) -> Duration {
        Duration::from_millis(self.gap_ms)
    }

    pub fn play_timeout(&self) -> Duration {
        Duration::from_secs(self.play_timeout_secs)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_database_path() -> PathBuf {
    DatabaseConnection::default_database_path()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_gap_ms() -> u64 {
    200
}

fn default_player() -> Vec<String> {
    ["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_play_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(anyhow!("Database path must not be empty"));
        }

        // Partial overrides are rejected before any store is opened
        self.schema
            .resolve()
            .map_err(|e| anyhow!("Invalid schema override: {}", e))?;

        if self.audio.player.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(anyhow!("Audio player command must not be empty"));
        }

        if self.audio.play_timeout_secs == 0 {
            return Err(anyhow!("Audio play timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Load a configuration file, writing the defaults first when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok((config, true))
    }

    /// Directory relative audio references resolve against
    ///
    /// Falls back to the directory holding the dictionary.
    pub fn audio_base_dir(&self) -> Option<PathBuf> {
        self.audio
            .audio_dir
            .clone()
            .or_else(|| self.database_path.parent().map(Path::to_path_buf))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: default_database_path(),
            schema: SchemaOverride::default(),
            search: SearchConfig::default(),
            audio: AudioConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
