//! Configuration file management for practube.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::SessionSettings;

/// Audio capture and metering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `practube list-devices`
    /// - device name from `practube list-devices`
    pub device: String,
    /// Peak readings above this level (dBFS) count as practice time
    pub loudness_threshold_db: f32,
    /// Polling period in milliseconds; each loud tick credits this much practice
    pub tick_interval_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: "default".to_string(),
            loudness_threshold_db: -20.0,
            tick_interval_ms: 50,
        }
    }
}

/// Durations pre-filled on the setup screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub practice_minutes: f64,
    pub reward_minutes: f64,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            practice_minutes: 1.0,
            reward_minutes: 1.0,
        }
    }
}

/// Where the reward points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub url: String,
    /// Open `url` in the system browser when practice finishes
    pub open_browser: bool,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            url: "https://www.youtube.com/intl/ALL_jp/kids/".to_string(),
            open_browser: true,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PractubeConfig {
    pub audio: AudioConfig,
    pub session: SessionDefaults,
    pub reward: RewardConfig,
}

impl PractubeConfig {
    /// Loads configuration from the user's config directory, writing the
    /// defaults there first if no file exists yet.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed or a value is out of range
    pub fn load_or_create() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            tracing::info!("Creating default config at {}", config_path.display());
            Self::default().save_to(&config_path)?;
        }
        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from `path`.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed or a value is out of range
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: PractubeConfig = toml::from_str(&config_content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Writes configuration to `path`, creating parent directories.
    ///
    /// # Errors
    /// - If the directory cannot be created or the file cannot be written
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_content = toml::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }

    /// Controller tuning derived from the audio section.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            tick_interval: Duration::from_millis(self.audio.tick_interval_ms),
            loudness_threshold_db: self.audio.loudness_threshold_db,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.audio.tick_interval_ms == 0 {
            return Err(anyhow!("audio.tick_interval_ms must be greater than 0"));
        }
        if !self.audio.loudness_threshold_db.is_finite() {
            return Err(anyhow!("audio.loudness_threshold_db must be a number"));
        }
        Ok(())
    }
}

/// Retrieves the path to the config file, `~/.config/practube/practube.toml`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("practube").join("practube.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("practube.toml");
        fs::write(&path, "[session]\npractice_minutes = 2.5\n").unwrap();

        let config = PractubeConfig::load_from(&path).unwrap();
        assert_eq!(config.session.practice_minutes, 2.5);
        assert_eq!(config.session.reward_minutes, 1.0);
        assert_eq!(config.audio, AudioConfig::default());
        assert_eq!(config.reward, RewardConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("practube.toml");
        let mut config = PractubeConfig::default();
        config.audio.device = "1".to_string();
        config.reward.url = "https://example.com/cartoons".to_string();

        config.save_to(&path).unwrap();
        assert_eq!(PractubeConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("practube.toml");
        fs::write(&path, "[audio]\ntick_interval_ms = 0\n").unwrap();
        assert!(PractubeConfig::load_from(&path).is_err());
    }

    #[test]
    fn settings_follow_audio_section() {
        let settings = PractubeConfig::default().session_settings();
        assert_eq!(settings.tick_interval, Duration::from_millis(50));
        assert_eq!(settings.loudness_threshold_db, -20.0);
    }
}
