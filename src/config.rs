//! Configuration file handling.
//!
//! Lives at `<config_dir>/abloop/config.toml` unless `ABLOOP_CONFIG` points
//! somewhere else. Every field has a default, so a missing file or a file
//! with only some keys set both load fine.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::interval::MIN_GAP;
use crate::sections::{DEFAULT_EXPORT_PREFIX, DEFAULT_MERGE_TOLERANCE, DEFAULT_STORAGE_PREFIX};
use crate::session::SessionOptions;
use crate::sync::{RateLadder, DEFAULT_RATES};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "ABLOOP_CONFIG";

const APP_DIR: &str = "abloop";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub sections: SectionsConfig,
}

/// `[playback]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Poll period in milliseconds
    pub poll_interval_ms: u64,
    /// Minimum seconds between A and B
    pub min_gap: f64,
    /// Rates used when the player does not list its own
    pub default_rates: Vec<f64>,
    /// Seconds moved by a seek command
    pub seek_step: f64,
    /// Seconds moved by a fine seek command
    pub fine_seek_step: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            min_gap: MIN_GAP,
            default_rates: DEFAULT_RATES.to_vec(),
            seek_step: 5.0,
            fine_seek_step: 1.0,
        }
    }
}

/// `[sections]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    /// Key prefix in the section store
    pub storage_prefix: String,
    /// Seconds within which imported sections count as duplicates
    pub merge_tolerance: f64,
    /// Export filenames are `<export_prefix>-<video id>.json`
    pub export_prefix: String,
    /// Section store directory (default: `<data_dir>/abloop/sections`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the config file, creating its directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join(APP_DIR).join("config.toml"))
    }

    /// Directory holding stored sections.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.sections.storage_dir {
            return Ok(dir.clone());
        }
        let dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(dir.join(APP_DIR).join("sections"))
    }

    /// Session tunables from this config.
    ///
    /// An unusable `default_rates` list falls back to the built-in ladder.
    pub fn session_options(&self) -> SessionOptions {
        let playback = &self.playback;
        SessionOptions {
            poll_interval: Duration::from_millis(playback.poll_interval_ms.max(1)),
            min_gap: if playback.min_gap > 0.0 {
                playback.min_gap
            } else {
                MIN_GAP
            },
            default_rates: RateLadder::new(playback.default_rates.clone()).unwrap_or_default(),
            seek_step: playback.seek_step,
            fine_seek_step: playback.fine_seek_step,
            merge_tolerance: self.sections.merge_tolerance,
        }
    }
}
