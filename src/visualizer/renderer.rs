//! Bar rasterization with the played/unplayed color split.

use super::decoder::Sample;
use super::surface::{BarStyle, DrawSurface};

/// Horizontal offset of the placeholder text from the view's center.
const PLACEHOLDER_OFFSET: f32 = 50.0;

/// Placement of one bar, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpec {
    pub index: usize,
    pub amplitude: Sample,
    pub x: f32,
    pub width: f32,
}

impl BarSpec {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Vertical band the bars grow in, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: f32,
    pub height: f32,
}

impl Band {
    /// Band of `height` centered in a view of `view_height`.
    pub fn centered(view_height: f32, height: f32) -> Self {
        Band {
            top: ((view_height - height) / 2.0).floor(),
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Height of a bar for `amplitude`, never thinner than one pixel.
    pub fn bar_height(&self, amplitude: Sample) -> f32 {
        (self.height * amplitude.fraction()).max(1.0)
    }
}

/// Draws bars against a progress boundary.
#[derive(Debug, Clone, Copy)]
pub struct ProgressRenderer {
    band: Band,
}

impl ProgressRenderer {
    pub fn new(band: Band) -> Self {
        Self { band }
    }

    /// Emits every bar in `bars`, splitting the one that straddles `boundary`.
    ///
    /// Returns the number of bars drawn.
    pub fn render<S, I>(&self, bars: I, boundary: f32, surface: &mut S) -> usize
    where
        S: DrawSurface + ?Sized,
        I: IntoIterator<Item = BarSpec>,
    {
        let mut drawn = 0;
        for bar in bars {
            self.render_bar(&bar, boundary, surface);
            drawn += 1;
        }
        drawn
    }

    fn render_bar<S: DrawSurface + ?Sized>(&self, bar: &BarSpec, boundary: f32, surface: &mut S) {
        let bottom = self.band.bottom();
        let top = self.band.top + (self.band.height - self.band.bar_height(bar.amplitude));
        let right = bar.right();

        if right <= boundary {
            surface.fill_rect(bar.x, top, right, bottom, BarStyle::Played);
        } else if bar.x >= boundary {
            surface.fill_rect(bar.x, top, right, bottom, BarStyle::Unplayed);
        } else {
            surface.fill_rect(bar.x, top, boundary, bottom, BarStyle::Played);
            surface.fill_rect(boundary, top, right, bottom, BarStyle::Unplayed);
        }
    }
}

/// Draws the "nothing to show" marker in place of bars.
pub fn render_placeholder<S: DrawSurface + ?Sized>(
    surface: &mut S,
    view_width: f32,
    view_height: f32,
    text: &str,
) {
    surface.draw_text(
        view_width / 2.0 - PLACEHOLDER_OFFSET,
        view_height / 2.0,
        text,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::surface::{CommandRecorder, DrawCommand};

    const PITCH: f32 = 3.0;
    const BAR_WIDTH: f32 = 2.0;

    fn bars(amplitudes: &[u8]) -> Vec<BarSpec> {
        amplitudes
            .iter()
            .enumerate()
            .map(|(index, &a)| BarSpec {
                index,
                amplitude: Sample::new(a),
                x: index as f32 * PITCH,
                width: BAR_WIDTH,
            })
            .collect()
    }

    fn draw(bars: &[BarSpec], boundary: f32) -> Vec<DrawCommand> {
        let mut recorder = CommandRecorder::new();
        ProgressRenderer::new(Band { top: 10.0, height: 28.0 }).render(
            bars.iter().copied(),
            boundary,
            &mut recorder,
        );
        recorder.into_commands()
    }

    fn styles(commands: &[DrawCommand]) -> Vec<BarStyle> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { style, .. } => Some(*style),
                DrawCommand::Text { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_full_amplitude_fills_band() {
        let commands = draw(&bars(&[31]), 0.0);
        assert_eq!(
            commands,
            vec![DrawCommand::FillRect {
                x0: 0.0,
                y0: 10.0,
                x1: 2.0,
                y1: 38.0,
                style: BarStyle::Unplayed,
            }]
        );
    }

    #[test]
    fn test_silent_bar_is_one_pixel_tall() {
        let commands = draw(&bars(&[0]), 0.0);
        match &commands[0] {
            DrawCommand::FillRect { y0, y1, .. } => assert_eq!(y1 - y0, 1.0),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bars_are_bottom_aligned() {
        for command in draw(&bars(&[0, 5, 16, 31]), 0.0) {
            match command {
                DrawCommand::FillRect { y0, y1, .. } => {
                    assert_eq!(y1, 38.0);
                    assert!(y0 >= 10.0 && y0 < y1);
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn test_boundary_extremes() {
        let row = bars(&[4, 8, 15, 16, 23, 31]);
        let total = row.last().unwrap().right();

        let none = draw(&row, 0.0);
        assert_eq!(none.len(), row.len());
        assert!(styles(&none).iter().all(|s| *s == BarStyle::Unplayed));

        let all = draw(&row, total);
        assert_eq!(all.len(), row.len());
        assert!(styles(&all).iter().all(|s| *s == BarStyle::Played));
    }

    #[test]
    fn test_boundary_touching_bar_edges_does_not_split() {
        let row = bars(&[10, 10]);
        // Right edge of bar 0 and left edge of bar 1 respectively.
        assert_eq!(styles(&draw(&row, 2.0)), vec![BarStyle::Played, BarStyle::Unplayed]);
        assert_eq!(styles(&draw(&row, 3.0)), vec![BarStyle::Played, BarStyle::Unplayed]);
    }

    #[test]
    fn test_split_bar_meets_at_boundary() {
        let commands = draw(&bars(&[31]), 1.0);
        assert_eq!(commands.len(), 2);
        match (&commands[0], &commands[1]) {
            (
                DrawCommand::FillRect { x0: a0, x1: a1, style: s0, .. },
                DrawCommand::FillRect { x0: b0, x1: b1, style: s1, .. },
            ) => {
                assert_eq!((*a0, *a1, *s0), (0.0, 1.0, BarStyle::Played));
                assert_eq!((*b0, *b1, *s1), (1.0, 2.0, BarStyle::Unplayed));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_split_preserves_total_width_for_every_boundary() {
        let row = bars(&[1, 2, 3, 5, 8, 13, 21, 30, 7]);
        let total = row.last().unwrap().right();
        let expected: f32 = row.iter().map(|b| b.width).sum();

        let mut boundary = 0.0;
        while boundary <= total {
            let commands = draw(&row, boundary);
            let width: f32 = commands.iter().map(DrawCommand::width).sum();
            assert!((width - expected).abs() < 1e-4, "boundary {boundary}");

            for command in &commands {
                match command {
                    DrawCommand::FillRect { x1, style: BarStyle::Played, .. } => {
                        assert!(*x1 <= boundary)
                    }
                    DrawCommand::FillRect { x0, style: BarStyle::Unplayed, .. } => {
                        assert!(*x0 >= boundary)
                    }
                    DrawCommand::Text { .. } => panic!("unexpected text"),
                }
            }
            boundary += 0.25;
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let row = bars(&[9, 18, 27]);
        assert_eq!(draw(&row, 4.5), draw(&row, 4.5));
    }

    #[test]
    fn test_placeholder_position() {
        let mut recorder = CommandRecorder::new();
        render_placeholder(&mut recorder, 300.0, 40.0, "No audio data");
        assert_eq!(
            recorder.commands(),
            &[DrawCommand::Text {
                x: 100.0,
                y: 20.0,
                text: "No audio data".to_string(),
            }]
        );
    }

    #[test]
    fn test_centered_band() {
        let band = Band::centered(41.0, 28.0);
        assert_eq!(band.top, 6.0);
        assert_eq!(band.bottom(), 34.0);
        assert_eq!(Band::centered(10.0, 28.0).top, -9.0);
    }
}
