//! Configuration file management for barwave.
//!
//! This module handles loading and writing application configuration from TOML files.
//! Configuration is stored in the user's config directory and created with defaults
//! the first time it is loaded.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::visualizer::RenderConfig;

/// Colors used by the terminal host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Bars (or bar parts) left of the playback position
    #[serde(default = "default_played_color")]
    pub played_color: String,
    /// Bars (or bar parts) right of the playback position
    #[serde(default = "default_unplayed_color")]
    pub unplayed_color: String,
    /// Placeholder text shown when there is no audio data
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: String,
}

fn default_played_color() -> String {
    "#ff4081".to_string()
}

fn default_unplayed_color() -> String {
    "gray".to_string()
}

fn default_placeholder_color() -> String {
    "#b9cfd4".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            played_color: default_played_color(),
            unplayed_color: default_unplayed_color(),
            placeholder_color: default_placeholder_color(),
        }
    }
}

impl ThemeConfig {
    pub fn played(&self) -> Color {
        parse_color(&self.played_color, Color::Magenta)
    }

    pub fn unplayed(&self) -> Color {
        parse_color(&self.unplayed_color, Color::Gray)
    }

    pub fn placeholder(&self) -> Color {
        parse_color(&self.placeholder_color, Color::Reset)
    }
}

/// Parses a color name or `#rrggbb` string, falling back on error.
fn parse_color(value: &str, fallback: Color) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        tracing::warn!("Invalid color '{value}' in config, using {fallback}");
        fallback
    })
}

/// Playback simulation settings for the `play` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Duration assumed for a buffer when none is given on the command line
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f32,
    /// Time between redraws in milliseconds
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    /// Fraction of the track skipped by one seek key press
    #[serde(default = "default_seek_step")]
    pub seek_step: f32,
}

fn default_duration_secs() -> f32 {
    30.0
}

fn default_frame_ms() -> u64 {
    50
}

fn default_seek_step() -> f32 {
    0.05
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            frame_ms: default_frame_ms(),
            seek_step: default_seek_step(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BarwaveConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl BarwaveConfig {
    /// Loads configuration from the user's config directory, writing defaults if the
    /// file does not exist yet.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            tracing::info!(
                "No config file found, writing defaults to {}",
                config_path.display()
            );
            let config = BarwaveConfig::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config_content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
        Self::parse(&config_content)
    }

    /// Parses configuration from TOML text. Unusable bar geometry is replaced by
    /// defaults with a warning.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut config: BarwaveConfig = toml::from_str(content)?;
        config.render.sanitize();
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let config_content = toml::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Retrieves the path to the config file, creating its directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not find home directory",
            )
        })?
        .join(".config")
        .join("barwave");

    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join("barwave.toml"))
}
