//! Waveform bar visualizer.
//!
//! The pipeline runs once per redraw: samples are decoded on demand from the packed
//! buffer (`decoder`), assigned to bars by a fractional accumulator (`accumulator`), and
//! drawn with a played/unplayed split at the progress boundary (`renderer`). Hosts plug in
//! through the `surface` traits; `view` ties the pieces together.

pub mod accumulator;
pub mod decoder;
pub mod renderer;
pub mod surface;
pub mod view;

pub use accumulator::{plan, BarPlan, BarSlot};
pub use decoder::{decode, decode_zero_filled, pack_samples, AmplitudeBuffer, DecodeError, Sample};
pub use renderer::{BarSpec, ProgressRenderer};
pub use surface::{BarStyle, CommandRecorder, Density, DrawCommand, DrawSurface, UnitConverter};
pub use view::{Aggregation, PlayerVisualizer, RenderConfig};
