//! Application command handlers for barwave.
//!
//! # Commands
//! - `render`: Print a one-shot render of an amplitude buffer
//! - `play`: Watch simulated playback of an amplitude buffer
//! - `width`: Print the content-driven width of an amplitude buffer
//! - `pack`: Build an amplitude buffer from plain numbers
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod config;
pub mod logs;
pub mod pack;
pub mod play;
pub mod render;
pub mod width;

pub use config::handle_config;
pub use logs::handle_logs;
pub use pack::handle_pack;
pub use play::handle_play;
pub use render::{handle_render, RenderOptions};
pub use width::handle_width;

use anyhow::anyhow;
use std::path::Path;

/// Reads a packed amplitude buffer from disk.
///
/// # Errors
/// - If the file does not exist or cannot be read
pub fn read_amplitude_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    if !path.exists() {
        return Err(anyhow!("Amplitude file not found: {}", path.display()));
    }
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow!("Failed to read amplitude file {}: {e}", path.display()))?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
