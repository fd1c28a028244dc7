use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_system::GlobalAudioSettings;
use crate::error::ConfigError;

/// Host configuration.
///
/// Startup values only: volume and mute changes made at runtime are never
/// written back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the `sound-<name>.<extension>` files
    pub asset_dir: PathBuf,

    /// Audio file extension
    pub extension: String,

    /// Global volume at startup (0.0-1.0)
    pub initial_volume: f64,

    /// Start with audio muted
    pub start_muted: bool,

    /// Start the background music as soon as the event loop runs
    pub autoplay_music: bool,

    /// How often the event loop checks for finished sounds
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("sounds"),
            extension: "mp3".to_string(),
            initial_volume: 1.0,
            start_muted: false,
            autoplay_music: true,
            poll_interval_ms: 50,
        }
    }
}

impl Config {
    /// Load configuration from the app's base directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            tracing::info!("Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            tracing::info!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(ConfigError::Invalid(format!(
                "initial_volume must be within 0.0-1.0, got {}",
                self.initial_volume
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings the controller starts with.
    pub fn audio_settings(&self) -> GlobalAudioSettings {
        GlobalAudioSettings::new(self.initial_volume, self.start_muted)
    }

    /// Asset directory, resolved against the config directory when relative.
    pub fn asset_dir_full_path(&self) -> Result<PathBuf, ConfigError> {
        if self.asset_dir.is_absolute() {
            return Ok(self.asset_dir.clone());
        }
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::Invalid("config path has no parent".to_string()))?;
        Ok(config_dir.join(&self.asset_dir))
    }

    /// Get the config file path (in app's base directory)
    fn config_path() -> Result<PathBuf, ConfigError> {
        let exe_path = env::current_exe().map_err(|e| ConfigError::LoadFailed {
            path: "<current executable>".to_string(),
            source: Box::new(e),
        })?;
        let exe_dir = exe_path.parent().ok_or_else(|| {
            ConfigError::Invalid("Could not determine executable directory".to_string())
        })?;

        Ok(exe_dir.join("config").join("config.json"))
    }

    /// Get the config file path (for display purposes)
    pub fn config_path_display() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
