//! One-shot waveform render to the terminal.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, Terminal, TerminalOptions, Viewport};
use ratatui::backend::CrosstermBackend;
use std::io::{self, IsTerminal};
use std::path::Path;

use super::read_amplitude_file;
use crate::config::BarwaveConfig;
use crate::ui::{buffer_lines, SurfaceStyles, WaveformWidget};
use crate::visualizer::PlayerVisualizer;

const DEFAULT_HEIGHT: u16 = 8;
const FALLBACK_TERMINAL_WIDTH: u16 = 80;

/// Options for [`handle_render`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Playback position in `[0, 1]`
    pub progress: f32,
    /// Width in cells; defaults to the content-driven width capped at the terminal width
    pub width: Option<u16>,
    /// Height in cells
    pub height: Option<u16>,
    /// Print symbols only, without colors or terminal control
    pub plain: bool,
}

/// Renders the amplitude buffer in `file` once and prints it.
///
/// # Errors
/// - If the config or the buffer file cannot be read
/// - If terminal output fails
pub fn handle_render(file: &Path, options: RenderOptions) -> anyhow::Result<()> {
    let config = BarwaveConfig::load()?;
    let bytes = read_amplitude_file(file)?;

    let mut visualizer = PlayerVisualizer::new(config.render.clone());
    visualizer.set_buffer(bytes);
    visualizer.set_progress(options.progress);

    let available = crossterm::terminal::size()
        .map(|(columns, _)| columns)
        .unwrap_or(FALLBACK_TERMINAL_WIDTH);
    let width = options
        .width
        .unwrap_or_else(|| content_columns(&visualizer, available));
    let height = options.height.unwrap_or(DEFAULT_HEIGHT).max(1);

    tracing::info!(
        "Rendering {} at {:.0}% into {}x{} cells",
        file.display(),
        visualizer.progress() * 100.0,
        width,
        height
    );

    let styles = SurfaceStyles::from(&config.theme);
    if options.plain || !io::stdout().is_terminal() {
        for line in render_lines(&visualizer, styles, width, height) {
            println!("{line}");
        }
        return Ok(());
    }

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )?;
    terminal.draw(|frame| {
        let area = frame.area();
        let area = Rect {
            width: width.min(area.width),
            ..area
        };
        frame.render_widget(WaveformWidget::new(&visualizer, styles), area);
    })?;
    println!();
    Ok(())
}

/// Columns the widget asks for, never wider than `available`.
fn content_columns(visualizer: &PlayerVisualizer, available: u16) -> u16 {
    visualizer
        .desired_content_width(Some(available as f32))
        .map(|w| (w.ceil() as u16).clamp(1, available.max(1)))
        .unwrap_or(available)
}

/// Renders into an off-screen buffer and returns its rows as text.
pub fn render_lines(
    visualizer: &PlayerVisualizer,
    styles: SurfaceStyles,
    width: u16,
    height: u16,
) -> Vec<String> {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    WaveformWidget::new(visualizer, styles).render(area, &mut buf);
    buffer_lines(&buf, area)
}
