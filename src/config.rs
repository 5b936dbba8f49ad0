//! Configuration management
//!
//! Settings live in a TOML file under the platform config directory. Every
//! section and field has a default, so a missing or partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::recording::ContainerFormat;

const APP_DIR: &str = "termreplay";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub decode: DecodeConfig,
    pub terminal: TerminalConfig,
}

/// Playback timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial speed multiplier
    pub speed: f64,
    /// Longest wait between two frames, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_time_limit: Option<f64>,
    /// Seconds moved by one seek key press
    pub seek_step: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            idle_time_limit: None,
            seek_step: 5.0,
        }
    }
}

/// Recording decoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub format: ContainerFormat,
}

/// Terminal size assumed before a recording announces one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub cols: u16,
    pub rows: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join(APP_DIR).join("config.toml"))
    }

    /// Get the log file path.
    pub fn log_path() -> Result<PathBuf> {
        let dir = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .context("Could not determine data directory")?;
        Ok(dir.join(APP_DIR).join("termreplay.log"))
    }

    /// Seek distance as a duration; non-positive or invalid steps fall back to the default.
    pub fn seek_step(&self) -> std::time::Duration {
        let secs = self.playback.seek_step;
        if secs.is_finite() && secs > 0.0 {
            std::time::Duration::try_from_secs_f64(secs)
                .unwrap_or(std::time::Duration::from_secs(5))
        } else {
            std::time::Duration::from_secs(5)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.playback.speed, 1.0);
        assert_eq!(config.playback.idle_time_limit, None);
        assert_eq!(config.playback.seek_step, 5.0);
        assert_eq!(config.decode.format, ContainerFormat::Auto);
        assert_eq!(config.terminal.cols, 80);
        assert_eq!(config.terminal.rows, 24);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [playback]
            idle_time_limit = 2.0

            [decode]
            format = "html-export"
            "#,
        )
        .unwrap();
        assert_eq!(config.playback.speed, 1.0);
        assert_eq!(config.playback.idle_time_limit, Some(2.0));
        assert_eq!(config.decode.format, ContainerFormat::HtmlExport);
        assert_eq!(config.terminal, TerminalConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.playback.speed = 2.0;
        config.playback.idle_time_limit = Some(1.5);
        config.terminal.cols = 120;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[playback\nspeed = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn seek_step_falls_back_when_invalid() {
        let mut config = Config::default();
        config.playback.seek_step = 2.5;
        assert_eq!(config.seek_step(), Duration::from_millis(2500));
        config.playback.seek_step = -1.0;
        assert_eq!(config.seek_step(), Duration::from_secs(5));
    }

    #[test]
    fn paths_live_under_app_dir() {
        if let Ok(path) = Config::config_path() {
            assert!(path.ends_with("termreplay/config.toml"));
        }
        if let Ok(path) = Config::log_path() {
            assert!(path.ends_with("termreplay/termreplay.log"));
        }
    }
}
