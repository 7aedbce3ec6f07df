//! Configuration management for barwave.
//!
//! Loads and saves the TOML configuration holding bar geometry, terminal colors and
//! playback simulation settings. The file lives in the user's config directory.

pub mod file;

pub use file::{get_config_path, BarwaveConfig, PlaybackConfig, ThemeConfig};
