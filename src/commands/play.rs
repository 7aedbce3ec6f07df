//! Simulated playback of an amplitude buffer.
//!
//! No audio is produced: a clock advances over the configured duration and drives the
//! visualizer's progress, so the waveform can be watched filling in and seeked around.

use std::path::Path;
use std::time::{Duration, Instant};

use super::read_amplitude_file;
use crate::config::BarwaveConfig;
use crate::ui::{PlaybackStatus, PlayerCommand, PlayerTui, SurfaceStyles};
use crate::visualizer::PlayerVisualizer;

const MIN_DURATION_SECS: f32 = 0.1;
const MIN_FRAME_MS: u64 = 10;

/// Playback position bookkeeping, independent of wall time.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    position: Duration,
    duration: Duration,
    paused: bool,
}

impl PlaybackClock {
    pub fn new(duration: Duration) -> Self {
        Self {
            position: Duration::ZERO,
            duration,
            paused: false,
        }
    }

    /// Moves the clock forward by `elapsed` unless paused. Stops at the end.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.paused {
            self.position = (self.position + elapsed).min(self.duration);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Jumps by `delta` of the total duration (negative seeks backwards).
    /// A non-finite `delta` leaves the position unchanged.
    pub fn seek(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let target = self.fraction() + delta;
        self.position = self.duration.mul_f32(target.clamp(0.0, 1.0));
    }

    /// Played share of the duration in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.position.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn finished(&self) -> bool {
        self.position >= self.duration
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            elapsed: self.position,
            duration: self.duration,
            paused: self.paused,
        }
    }
}

/// Converts a playback length in seconds, raising short lengths to the minimum.
///
/// # Errors
/// - If `seconds` is NaN, infinite or too large for a [`Duration`]
pub fn playback_duration(seconds: f32) -> anyhow::Result<Duration> {
    if !seconds.is_finite() {
        anyhow::bail!("Playback duration must be a finite number of seconds, got {seconds}");
    }
    Duration::try_from_secs_f32(seconds.max(MIN_DURATION_SECS))
        .map_err(|e| anyhow::anyhow!("Invalid playback duration {seconds}s: {e}"))
}

/// Checks the seek step is a fraction of the track in `[0, 1]`.
///
/// # Errors
/// - If `step` is NaN, infinite or outside `[0, 1]`
pub fn checked_seek_step(step: f32) -> anyhow::Result<f32> {
    if !step.is_finite() || !(0.0..=1.0).contains(&step) {
        anyhow::bail!("seek_step must be between 0 and 1, got {step}");
    }
    Ok(step)
}

/// Plays back the amplitude buffer in `file` in a full-screen view.
///
/// # Arguments
/// * `file` - Packed amplitude buffer
/// * `duration_secs` - Playback length; defaults to the configured duration
///
/// # Errors
/// - If the config or the buffer file cannot be read
/// - If the terminal cannot be set up or drawn to
pub async fn handle_play(file: &Path, duration_secs: Option<f32>) -> anyhow::Result<()> {
    tracing::info!("=== barwave Play Command ===");

    let config = BarwaveConfig::load()?;
    let bytes = read_amplitude_file(file)?;

    let mut visualizer = PlayerVisualizer::new(config.render.clone());
    visualizer.set_buffer(bytes);

    let seconds = duration_secs.unwrap_or(config.playback.duration_secs);
    let duration = playback_duration(seconds)?;
    let frame = Duration::from_millis(config.playback.frame_ms.max(MIN_FRAME_MS));
    let seek_step = checked_seek_step(config.playback.seek_step)?;

    let mut clock = PlaybackClock::new(duration);
    let mut tui = PlayerTui::new(SurfaceStyles::from(&config.theme))?;
    tracing::info!("Playing {} over {:.1}s", file.display(), seconds);

    let mut last_tick = Instant::now();
    let mut at_end = false;
    loop {
        let now = Instant::now();
        clock.advance(now - last_tick);
        last_tick = now;

        if clock.finished() && !at_end {
            tracing::info!("Playback reached the end");
        }
        at_end = clock.finished();

        visualizer.set_progress(clock.fraction());
        tui.render(&visualizer, clock.status())?;

        match tui.handle_input(Duration::ZERO)? {
            PlayerCommand::Quit => {
                tracing::info!("Playback stopped at {:.0}%", clock.fraction() * 100.0);
                break;
            }
            PlayerCommand::TogglePause => clock.toggle_pause(),
            PlayerCommand::SeekBackward => clock.seek(-seek_step),
            PlayerCommand::SeekForward => clock.seek(seek_step),
            PlayerCommand::Continue => {}
        }

        tokio::time::sleep(frame).await;
    }

    tui.cleanup()?;
    Ok(())
}
