//! Configuration management module
//!
//! Handles loading, saving, and validation of run configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{DirSpeedError, Result, APP_NAME, CONFIG_FILE, DEFAULT_REQUIRED_SPACE_MB};

pub mod persistence;

/// Run configuration: where to write and how much free space to insist on.
///
/// Directory existence and queryability are checked by the space preflight
/// at run start, not here; `validate` only rejects configurations that can
/// never be right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory the benchmark writes into
    pub target_dir: PathBuf,
    /// Free space required before any case runs, in MB
    pub required_space_mb: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            required_space_mb: DEFAULT_REQUIRED_SPACE_MB,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target directory
    pub fn with_target_dir(mut self, dir: PathBuf) -> Self {
        self.target_dir = dir;
        self
    }

    /// Set the preflight free-space threshold in MB
    pub fn with_required_space_mb(mut self, mb: u64) -> Self {
        self.required_space_mb = mb;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.target_dir.as_os_str().is_empty() {
            return Err(DirSpeedError::Config(
                "Target directory must not be empty".to_string(),
            ));
        }

        if self.required_space_mb == 0 {
            return Err(DirSpeedError::Config(
                "Required space threshold must be greater than 0 MB".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from the standard config file location.
    /// Returns the default configuration if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            DirSpeedError::Config(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            DirSpeedError::Config(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DirSpeedError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| DirSpeedError::Config(format!("Failed to serialize configuration: {}", e)))?;

        fs::write(&config_path, content).map_err(|e| {
            DirSpeedError::Config(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/dirspeed/dirspeed.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            DirSpeedError::Config("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
