//! Terminal hosting for the waveform visualizer.

pub mod player;
pub mod surface;

pub use player::{PlaybackStatus, PlayerCommand, PlayerTui};
pub use surface::{buffer_lines, SurfaceStyles, TerminalSurface, WaveformWidget};
