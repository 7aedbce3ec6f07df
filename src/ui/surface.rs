//! Terminal drawing surface and waveform widget.
//!
//! Device pixels are mapped onto terminal cells with a fixed horizontal and vertical
//! scale. A cell is painted when its center, in pixel space, lies inside the rectangle.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::config::ThemeConfig;
use crate::visualizer::{BarStyle, DrawSurface, PlayerVisualizer};

const PLAYED_SYMBOL: &str = "█";
const UNPLAYED_SYMBOL: &str = "▒";

/// Styles for the two bar states and the placeholder text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceStyles {
    pub played: Style,
    pub unplayed: Style,
    pub placeholder: Style,
}

impl From<&ThemeConfig> for SurfaceStyles {
    fn from(theme: &ThemeConfig) -> Self {
        Self {
            played: Style::default().fg(theme.played()),
            unplayed: Style::default().fg(theme.unplayed()),
            placeholder: Style::default().fg(theme.placeholder()),
        }
    }
}

/// [`DrawSurface`] writing into a region of a ratatui [`Buffer`].
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    scale_x: f32,
    scale_y: f32,
    styles: SurfaceStyles,
}

impl<'a> TerminalSurface<'a> {
    /// One pixel per cell in both directions.
    pub fn new(buf: &'a mut Buffer, area: Rect, styles: SurfaceStyles) -> Self {
        Self {
            buf,
            area,
            scale_x: 1.0,
            scale_y: 1.0,
            styles,
        }
    }

    /// Sets how many device pixels one cell spans. Non-positive scales are ignored.
    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        if scale_x > 0.0 {
            self.scale_x = scale_x;
        }
        if scale_y > 0.0 {
            self.scale_y = scale_y;
        }
        self
    }

    /// Size of the surface in device pixels.
    pub fn view_size(&self) -> (f32, f32) {
        (
            self.area.width as f32 * self.scale_x,
            self.area.height as f32 * self.scale_y,
        )
    }

    /// Cells whose centers fall inside `[start, end)` along one axis.
    fn cell_span(start: f32, end: f32, scale: f32, cells: u16) -> std::ops::Range<u16> {
        let first = (start / scale - 0.5).ceil().max(0.0);
        let last = (end / scale - 0.5).ceil().clamp(0.0, cells as f32);
        if first >= last {
            return 0..0;
        }
        first as u16..last as u16
    }
}

impl DrawSurface for TerminalSurface<'_> {
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: BarStyle) {
        let (symbol, style) = match style {
            BarStyle::Played => (PLAYED_SYMBOL, self.styles.played),
            BarStyle::Unplayed => (UNPLAYED_SYMBOL, self.styles.unplayed),
        };

        let columns = Self::cell_span(x0, x1, self.scale_x, self.area.width);
        let rows = Self::cell_span(y0, y1, self.scale_y, self.area.height);
        for row in rows {
            for column in columns.clone() {
                self.buf[(self.area.x + column, self.area.y + row)]
                    .set_symbol(symbol)
                    .set_style(style);
            }
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        if self.area.width == 0 || self.area.height == 0 {
            return;
        }
        let column = ((x / self.scale_x).floor().max(0.0) as u16).min(self.area.width - 1);
        let row = ((y / self.scale_y).floor().max(0.0) as u16).min(self.area.height - 1);
        let room = (self.area.width - column) as usize;
        self.buf.set_stringn(
            self.area.x + column,
            self.area.y + row,
            text,
            room,
            self.styles.placeholder,
        );
    }
}

/// Vertical scale that fits a band of `band_px` pixels into `rows` cells.
pub fn vertical_scale(band_px: f32, rows: u16) -> f32 {
    if rows == 0 {
        return 1.0;
    }
    (band_px / rows as f32).max(1.0)
}

/// Renders a [`PlayerVisualizer`] as a ratatui widget.
pub struct WaveformWidget<'a> {
    visualizer: &'a PlayerVisualizer,
    styles: SurfaceStyles,
}

impl<'a> WaveformWidget<'a> {
    pub fn new(visualizer: &'a PlayerVisualizer, styles: SurfaceStyles) -> Self {
        Self { visualizer, styles }
    }
}

impl Widget for WaveformWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let scale_y = vertical_scale(self.visualizer.config().bar_height_px(), area.height);
        let mut surface = TerminalSurface::new(buf, area, self.styles).with_scale(1.0, scale_y);
        let (width, height) = surface.view_size();
        self.visualizer.render_to(&mut surface, width, height);
    }
}

/// Plain-text rows of `area` in `buf`, with trailing blanks trimmed.
pub fn buffer_lines(buf: &Buffer, area: Rect) -> Vec<String> {
    (area.y..area.y + area.height)
        .map(|y| {
            let line: String = (area.x..area.x + area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}
