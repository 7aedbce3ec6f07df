//! Progress-aware waveform bars for packed 5-bit amplitude envelopes.
//!
//! The [`visualizer`] module is the widget itself and has no terminal dependencies beyond
//! the [`visualizer::DrawSurface`] it draws through. The remaining modules make up the
//! `barwave` terminal front-end.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod ui;
pub mod visualizer;

pub use visualizer::{PlayerVisualizer, RenderConfig};
