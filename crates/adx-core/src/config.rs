//! Configuration management for adx.
//!
//! Loads configuration from `${ADX_HOME}/config.toml` with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Every field is optional in the file; absent fields fall back to the
/// defaults below. The config file itself is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file loaded at startup, skipping the catalog prompt.
    pub catalog: Option<PathBuf>,
    /// Directory scanned for `.adx` catalog files.
    pub data_dir: Option<PathBuf>,
    /// Log file location. Defaults to `${ADX_HOME}/adx.log`.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the directory scanned for catalog files.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(paths::default_data_dir)
    }

    /// Returns the log file location.
    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(paths::log_path)
    }
}

pub mod paths {
    //! Path resolution for adx configuration and data directories.
    //!
    //! ADX_HOME resolution order:
    //! 1. ADX_HOME environment variable (if set)
    //! 2. ~/.config/adx (default)

    use std::path::PathBuf;

    /// Returns the adx home directory.
    ///
    /// Checks ADX_HOME env var first, falls back to ~/.config/adx
    pub fn adx_home() -> PathBuf {
        if let Ok(home) = std::env::var("ADX_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("adx"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        adx_home().join("config.toml")
    }

    /// Returns the directory scanned for catalog files by default.
    pub fn default_data_dir() -> PathBuf {
        adx_home().join("catalogs")
    }

    /// Returns the default log file path.
    pub fn log_path() -> PathBuf {
        adx_home().join("adx.log")
    }
}
