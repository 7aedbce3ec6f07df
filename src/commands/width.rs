//! Content-driven width query.

use std::path::Path;

use super::read_amplitude_file;
use crate::config::BarwaveConfig;
use crate::visualizer::PlayerVisualizer;

/// Prints the width, in device pixels, the widget would ask layout for.
///
/// # Arguments
/// * `file` - Packed amplitude buffer
/// * `available` - Width layout is offering, if any
///
/// # Errors
/// - If the config or the buffer file cannot be read
pub fn handle_width(file: &Path, available: Option<f32>) -> anyhow::Result<()> {
    let config = BarwaveConfig::load()?;
    let bytes = read_amplitude_file(file)?;

    let mut visualizer = PlayerVisualizer::new(config.render);
    visualizer.set_buffer(bytes);

    let width = visualizer
        .desired_content_width(available)
        .ok_or_else(|| anyhow::anyhow!("No amplitude buffer loaded"))?;

    tracing::debug!(?available, width, "Computed content width");
    println!("{width}");
    Ok(())
}
