//! Drawing seam between the visualizer and whatever hosts it.

/// Fill style of a bar segment. Hosts map these to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarStyle {
    /// Left of the progress boundary
    Played,
    /// Right of the progress boundary
    Unplayed,
}

/// A single primitive emitted by a render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Axis-aligned rectangle covering `[x0, x1) x [y0, y1)` in device pixels.
    FillRect {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        style: BarStyle,
    },
    /// Text anchored at its baseline start.
    Text { x: f32, y: f32, text: String },
}

impl DrawCommand {
    /// Horizontal extent of a rectangle; zero for text.
    pub fn width(&self) -> f32 {
        match self {
            DrawCommand::FillRect { x0, x1, .. } => x1 - x0,
            DrawCommand::Text { .. } => 0.0,
        }
    }
}

/// Receiver of draw commands.
pub trait DrawSurface {
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: BarStyle);

    fn draw_text(&mut self, x: f32, y: f32, text: &str);

    /// Replays a recorded command onto this surface.
    fn apply(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::FillRect {
                x0,
                y0,
                x1,
                y1,
                style,
            } => self.fill_rect(*x0, *y0, *x1, *y1, *style),
            DrawCommand::Text { x, y, text } => self.draw_text(*x, *y, text),
        }
    }
}

/// Surface that just keeps the commands it receives.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl DrawSurface for CommandRecorder {
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: BarStyle) {
        self.commands.push(DrawCommand::FillRect {
            x0,
            y0,
            x1,
            y1,
            style,
        });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
        });
    }
}

/// Converts logical layout units into device pixels.
pub trait UnitConverter {
    fn to_device_pixels(&self, logical: f32) -> f32;
}

/// Screen density scale. Results are rounded up to whole pixels, and zero stays zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density(pub f32);

impl Default for Density {
    fn default() -> Self {
        Density(1.0)
    }
}

impl UnitConverter for Density {
    fn to_device_pixels(&self, logical: f32) -> f32 {
        if logical == 0.0 {
            return 0.0;
        }
        (self.0 * logical).ceil()
    }
}
