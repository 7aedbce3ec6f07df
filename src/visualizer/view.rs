//! Player visualizer widget.
//!
//! Holds the amplitude buffer, the playback progress and the render configuration, and
//! turns them into draw commands for a given view size. Every call to [`render`] starts
//! from scratch, so repeated calls with the same state produce the same commands.
//!
//! [`render`]: PlayerVisualizer::render

use serde::{Deserialize, Serialize};

use super::accumulator::{self, BarSlot, MIN_CONTENT_WIDTH};
use super::decoder::{AmplitudeBuffer, Sample};
use super::renderer::{self, Band, BarSpec, ProgressRenderer};
use super::surface::{CommandRecorder, Density, DrawCommand, DrawSurface, UnitConverter};

/// How a bar picks its amplitude from the samples it covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// First sample of the bar's range
    #[default]
    First,
    /// Loudest sample of the bar's range
    Peak,
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Peak => write!(f, "peak"),
        }
    }
}

/// Bar geometry in logical units, plus the density used to convert them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    /// Height of the visualization band (tallest bar)
    #[serde(default = "default_bar_height")]
    pub bar_height: f32,
    /// Width of a single bar
    #[serde(default = "default_bar_width")]
    pub bar_width: f32,
    /// Gap between neighbouring bars
    #[serde(default = "default_bar_spacing")]
    pub bar_spacing: f32,
    /// Device pixels per logical unit
    #[serde(default = "default_density")]
    pub density: f32,
    #[serde(default)]
    pub aggregation: Aggregation,
    /// Text drawn when there is nothing to visualize
    #[serde(default = "default_placeholder_text")]
    pub placeholder_text: String,
}

fn default_bar_height() -> f32 {
    28.0
}

fn default_bar_width() -> f32 {
    2.0
}

fn default_bar_spacing() -> f32 {
    1.0
}

fn default_density() -> f32 {
    1.0
}

fn default_placeholder_text() -> String {
    "No audio data".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bar_height: default_bar_height(),
            bar_width: default_bar_width(),
            bar_spacing: default_bar_spacing(),
            density: default_density(),
            aggregation: Aggregation::default(),
            placeholder_text: default_placeholder_text(),
        }
    }
}

impl RenderConfig {
    /// Replaces geometry that cannot be drawn (NaN, infinite, negative, or zero where a
    /// positive size is needed) with the default, logging a warning for each field.
    pub fn sanitize(&mut self) {
        sanitize_field("bar_height", &mut self.bar_height, default_bar_height(), false);
        sanitize_field("bar_width", &mut self.bar_width, default_bar_width(), false);
        sanitize_field("bar_spacing", &mut self.bar_spacing, default_bar_spacing(), true);
        sanitize_field("density", &mut self.density, default_density(), false);
    }

    fn density(&self) -> Density {
        Density(self.density)
    }

    /// Device-pixel distance from one bar's left edge to the next.
    pub fn pitch_px(&self) -> f32 {
        self.density().to_device_pixels(self.bar_width + self.bar_spacing)
    }

    pub fn bar_width_px(&self) -> f32 {
        self.density().to_device_pixels(self.bar_width)
    }

    pub fn bar_height_px(&self) -> f32 {
        self.density().to_device_pixels(self.bar_height)
    }
}

fn sanitize_field(name: &str, value: &mut f32, fallback: f32, allow_zero: bool) {
    let valid = value.is_finite() && (*value > 0.0 || (allow_zero && *value == 0.0));
    if !valid {
        tracing::warn!("Invalid render.{name} {value} in config, using {fallback}");
        *value = fallback;
    }
}

/// Waveform bar chart colored by playback progress.
#[derive(Debug, Clone, Default)]
pub struct PlayerVisualizer {
    buffer: Option<AmplitudeBuffer>,
    progress: f32,
    config: RenderConfig,
}

impl PlayerVisualizer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            buffer: None,
            progress: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn buffer(&self) -> Option<&AmplitudeBuffer> {
        self.buffer.as_ref()
    }

    /// Replaces the amplitude envelope.
    pub fn set_buffer(&mut self, bytes: impl Into<Vec<u8>>) {
        let buffer = AmplitudeBuffer::new(bytes);
        tracing::debug!(
            bytes = buffer.byte_len(),
            samples = buffer.sample_count(),
            "Amplitude buffer replaced"
        );
        self.buffer = Some(buffer);
    }

    pub fn clear_buffer(&mut self) {
        self.buffer = None;
    }

    /// Sets playback progress as a fraction, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, fraction: f32) {
        self.progress = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Pixel x-coordinate of the played/unplayed boundary in a view of `view_width`.
    pub fn progress_boundary(&self, view_width: f32) -> f32 {
        if view_width <= 0.0 || !view_width.is_finite() {
            return 0.0;
        }
        (view_width * self.progress).ceil().clamp(0.0, view_width)
    }

    /// Width the widget would like for its content, in device pixels.
    ///
    /// `available` is the width layout is offering, if known. Returns `None` without a
    /// buffer, leaving layout to pick a size.
    pub fn desired_content_width(&self, available: Option<f32>) -> Option<f32> {
        let buffer = self.buffer.as_ref()?;
        let min_width = self.config.density().to_device_pixels(MIN_CONTENT_WIDTH);
        Some(accumulator::content_width(
            buffer.sample_count(),
            self.config.pitch_px(),
            available,
            min_width,
        ))
    }

    /// Renders into a list of commands.
    pub fn render(&self, view_width: f32, view_height: f32) -> Vec<DrawCommand> {
        let mut recorder = CommandRecorder::new();
        self.render_to(&mut recorder, view_width, view_height);
        recorder.into_commands()
    }

    /// Renders straight onto `surface`. Returns the number of bars drawn.
    pub fn render_to<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        view_width: f32,
        view_height: f32,
    ) -> usize {
        let buffer = match &self.buffer {
            Some(buffer) if !buffer.is_empty() && view_width > 0.0 => buffer,
            _ => {
                renderer::render_placeholder(
                    surface,
                    view_width.max(0.0),
                    view_height,
                    &self.config.placeholder_text,
                );
                return 0;
            }
        };

        let pitch = self.config.pitch_px();
        let bar_width = self.config.bar_width_px();
        let target_bars = match accumulator::bars_for_width(view_width, pitch) {
            0 => fallback_bar_count(buffer.byte_len()),
            bars => bars,
        };

        let plan = accumulator::plan(buffer.sample_count(), target_bars);
        tracing::trace!(
            view_width,
            target_bars,
            bars = plan.bar_count(),
            samples_per_bar = plan.samples_per_bar(),
            "Rendering waveform"
        );

        let aggregation = self.config.aggregation;
        let bars = plan.map(|slot| BarSpec {
            index: slot.bar_index,
            amplitude: bar_amplitude(buffer, &slot, aggregation),
            x: slot.bar_index as f32 * pitch,
            width: bar_width,
        });

        let band = Band::centered(view_height, self.config.bar_height_px());
        ProgressRenderer::new(band).render(bars, self.progress_boundary(view_width), surface)
    }
}

/// Bar count used when the view is too narrow to fit a single bar.
fn fallback_bar_count(byte_len: usize) -> usize {
    (byte_len / 10).max(10)
}

fn bar_amplitude(buffer: &AmplitudeBuffer, slot: &BarSlot, aggregation: Aggregation) -> Sample {
    match aggregation {
        Aggregation::First => buffer.sample(slot.sample_index),
        Aggregation::Peak => buffer.peak(slot.samples()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::decoder::pack_samples;
    use crate::visualizer::surface::BarStyle;

    fn visualizer(values: &[u8]) -> PlayerVisualizer {
        let mut v = PlayerVisualizer::new(RenderConfig::default());
        v.set_buffer(pack_samples(values).unwrap());
        v
    }

    fn rects(commands: &[DrawCommand]) -> Vec<(f32, f32, f32, f32, BarStyle)> {
        commands
            .iter()
            .map(|c| match c {
                DrawCommand::FillRect {
                    x0,
                    y0,
                    x1,
                    y1,
                    style,
                } => (*x0, *y0, *x1, *y1, *style),
                other => panic!("unexpected command {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_no_buffer_renders_placeholder() {
        let v = PlayerVisualizer::default();
        let commands = v.render(300.0, 40.0);
        assert_eq!(
            commands,
            vec![DrawCommand::Text {
                x: 100.0,
                y: 20.0,
                text: "No audio data".to_string(),
            }]
        );
    }

    #[test]
    fn test_cleared_buffer_renders_placeholder() {
        let mut v = visualizer(&[31, 16, 8]);
        assert!(v.render(300.0, 40.0).len() >= 3);

        v.clear_buffer();
        assert!(v.buffer().is_none());
        assert_eq!(v.desired_content_width(Some(300.0)), None);
        assert!(matches!(v.render(300.0, 40.0).as_slice(), [DrawCommand::Text { .. }]));
    }

    #[test]
    fn test_empty_buffer_and_zero_width_render_placeholder() {
        let mut v = PlayerVisualizer::default();
        v.set_buffer(Vec::new());
        assert!(matches!(v.render(300.0, 40.0).as_slice(), [DrawCommand::Text { .. }]));

        let v = visualizer(&[1, 2, 3]);
        assert!(matches!(v.render(0.0, 40.0).as_slice(), [DrawCommand::Text { .. }]));
    }

    #[test]
    fn test_single_full_byte_draws_one_full_bar() {
        let mut v = PlayerVisualizer::default();
        v.set_buffer(vec![0b0001_1111]);
        let commands = rects(&v.render(300.0, 28.0));
        assert_eq!(commands, vec![(0.0, 0.0, 2.0, 28.0, BarStyle::Unplayed)]);
    }

    #[test]
    fn test_three_samples_in_wide_view_get_one_bar_each() {
        let v = visualizer(&[31, 0, 16]);
        let commands = rects(&v.render(300.0, 28.0));
        let xs: Vec<f32> = commands.iter().map(|r| r.0).collect();
        assert_eq!(xs, vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_narrow_view_compresses_samples() {
        let values: Vec<u8> = (0..100).map(|i| (i % 32) as u8).collect();
        let v = visualizer(&values);
        // 30px / 3px pitch: ten bars, each representing ten samples.
        let commands = rects(&v.render(30.0, 28.0));
        assert_eq!(commands.len(), 10);
        assert!(commands.iter().all(|r| r.2 <= 30.0));
    }

    #[test]
    fn test_aggregation_modes() {
        let values = [1, 30, 2, 3, 29, 4];
        let first = visualizer(&values);
        let mut config = RenderConfig::default();
        config.aggregation = Aggregation::Peak;
        let mut peak = PlayerVisualizer::new(config);
        peak.set_buffer(pack_samples(&values).unwrap());

        // Two bars of three samples.
        let first_tops: Vec<f32> = rects(&first.render(6.0, 28.0)).iter().map(|r| r.1).collect();
        let peak_tops: Vec<f32> = rects(&peak.render(6.0, 28.0)).iter().map(|r| r.1).collect();
        assert_eq!(first_tops.len(), 2);
        assert!(peak_tops[0] < first_tops[0]);
        assert!(peak_tops[1] < first_tops[1]);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut v = PlayerVisualizer::default();
        v.set_progress(1.7);
        assert_eq!(v.progress(), 1.0);
        v.set_progress(-3.0);
        assert_eq!(v.progress(), 0.0);
        v.set_progress(f32::NAN);
        assert_eq!(v.progress(), 0.0);
    }

    #[test]
    fn test_progress_boundary_rounds_up_and_clamps() {
        let mut v = PlayerVisualizer::default();
        v.set_progress(0.501);
        assert_eq!(v.progress_boundary(100.0), 51.0);
        v.set_progress(1.0);
        assert_eq!(v.progress_boundary(100.0), 100.0);
        assert_eq!(v.progress_boundary(0.0), 0.0);
    }

    #[test]
    fn test_seeking_backwards_repaints_unplayed() {
        let mut v = visualizer(&[20; 10]);
        v.set_progress(1.0);
        let played = rects(&v.render(30.0, 28.0));
        assert!(played.iter().all(|r| r.4 == BarStyle::Played));

        v.set_progress(0.0);
        let unplayed = rects(&v.render(30.0, 28.0));
        assert!(unplayed.iter().all(|r| r.4 == BarStyle::Unplayed));
    }

    #[test]
    fn test_every_progress_step_keeps_total_bar_width() {
        let values: Vec<u8> = (0..40).map(|i| (i * 5 % 32) as u8).collect();
        let mut v = visualizer(&values);
        let view_width = 120.0;
        for step in 0..=120 {
            v.set_progress(step as f32 / 120.0);
            let commands = v.render(view_width, 28.0);
            let width: f32 = commands.iter().map(DrawCommand::width).sum();
            assert_eq!(width, 40.0 * 2.0, "progress step {step}");
        }
    }

    #[test]
    fn test_render_twice_is_identical() {
        let mut v = visualizer(&[5, 10, 15, 20, 25, 30]);
        v.set_progress(0.4);
        assert_eq!(v.render(18.0, 32.0), v.render(18.0, 32.0));
    }

    #[test]
    fn test_too_narrow_view_uses_fallback_bar_count() {
        let values: Vec<u8> = vec![7; 64];
        let v = visualizer(&values);
        let commands = v.render(2.0, 28.0);
        assert_eq!(commands.len(), 10);
    }

    #[test]
    fn test_desired_content_width() {
        let v = PlayerVisualizer::default();
        assert_eq!(v.desired_content_width(Some(300.0)), None);

        let mut v = PlayerVisualizer::default();
        v.set_buffer(Vec::new());
        assert_eq!(v.desired_content_width(Some(300.0)), Some(100.0));

        let v = visualizer(&[3; 12]);
        assert_eq!(v.desired_content_width(Some(300.0)), Some(36.0));
    }

    #[test]
    fn test_density_scales_geometry() {
        let config = RenderConfig {
            density: 2.0,
            ..RenderConfig::default()
        };
        assert_eq!(config.pitch_px(), 6.0);
        assert_eq!(config.bar_width_px(), 4.0);
        assert_eq!(config.bar_height_px(), 56.0);

        let mut v = PlayerVisualizer::new(config);
        v.set_buffer(vec![0b0001_1111]);
        assert_eq!(v.desired_content_width(None), Some(6.0));
    }
}
