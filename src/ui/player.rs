//! Full-screen playback view.
//!
//! Shows the waveform colored by playback position, with a footer for elapsed time and
//! progress, and maps key presses to playback commands.

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    text::Span,
    widgets::Paragraph,
};
use std::io::{stdout, Stdout};
use std::time::Duration;

use super::surface::{SurfaceStyles, WaveformWidget};
use crate::visualizer::PlayerVisualizer;

/// User input during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Keep playing (no key pressed)
    Continue,
    /// Pause/resume (Space)
    TogglePause,
    /// Jump back (Left)
    SeekBackward,
    /// Jump ahead (Right)
    SeekForward,
    /// Leave the player (Escape, 'q' or Ctrl+C)
    Quit,
}

/// Snapshot of the playback clock shown in the footer.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackStatus {
    pub elapsed: Duration,
    pub duration: Duration,
    pub paused: bool,
}

/// Terminal UI hosting the waveform widget.
pub struct PlayerTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    styles: SurfaceStyles,
}

impl PlayerTui {
    /// Creates the player and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new(styles: SurfaceStyles) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(PlayerTui { terminal, styles })
    }

    /// Draws one frame.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(
        &mut self,
        visualizer: &PlayerVisualizer,
        status: PlaybackStatus,
    ) -> anyhow::Result<()> {
        let styles = self.styles;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let footer_height = 1;

            let waveform_area = Rect {
                height: area.height.saturating_sub(footer_height),
                ..area
            };
            frame.render_widget(WaveformWidget::new(visualizer, styles), waveform_area);

            let footer_area = Rect {
                y: area.y + area.height.saturating_sub(footer_height),
                height: footer_height.min(area.height),
                ..area
            };
            frame.render_widget(footer(visualizer.progress(), status, styles), footer_area);
        })?;
        Ok(())
    }

    /// Polls for a key press for up to `timeout`.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self, timeout: Duration) -> anyhow::Result<PlayerCommand> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: leaving player");
                        PlayerCommand::Quit
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: leaving player");
                        PlayerCommand::Quit
                    }
                    KeyCode::Char(' ') => PlayerCommand::TogglePause,
                    KeyCode::Left => PlayerCommand::SeekBackward,
                    KeyCode::Right => PlayerCommand::SeekForward,
                    _ => PlayerCommand::Continue,
                });
            }
        }
        Ok(PlayerCommand::Continue)
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for PlayerTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn footer(progress: f32, status: PlaybackStatus, styles: SurfaceStyles) -> Paragraph<'static> {
    let indicator = if status.paused {
        Span::styled("⏸ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("▶ ", styles.played)
    };

    let line = Line::from(vec![
        indicator,
        Span::raw(format!(
            "{} / {}",
            format_clock(status.elapsed),
            format_clock(status.duration)
        )),
        Span::raw(" / "),
        Span::raw(format!("{:.0}%", progress * 100.0)),
    ]);

    Paragraph::new(line).style(styles.placeholder)
}

/// Formats a duration as `m:ss`.
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
