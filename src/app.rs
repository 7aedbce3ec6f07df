//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands::{self, RenderOptions};
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// Terminal waveform bars for packed 5-bit amplitude envelopes
#[derive(Parser)]
#[command(name = "barwave")]
#[command(version)]
#[command(about = "Terminal waveform bars for packed 5-bit amplitude envelopes")]
#[command(long_about = "Terminal waveform bars for packed 5-bit amplitude envelopes.\n\nAn amplitude file is a raw byte buffer holding 5-bit values (0-31) packed back to back.\nBars are colored by playback progress.\n\nEXAMPLES:\n    # Build a buffer from numbers\n    $ barwave pack 3 9 17 31 12 -o clip.amp\n    $ seq 0 31 | barwave pack -o ramp.amp\n    \n    # Print it half played\n    $ barwave render ramp.amp -p 0.5\n    \n    # Watch simulated playback over 10 seconds\n    $ barwave play ramp.amp -d 10\n    \n    # Ask for the width the widget would like\n    $ barwave width ramp.amp -a 300")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/barwave/barwave.toml\n    Logs:               ~/.local/state/barwave/barwave.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a one-shot render of an amplitude file
    #[command(visible_alias = "r")]
    Render {
        /// Packed amplitude file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Playback progress between 0 and 1
        #[arg(short, long, default_value_t = 0.0)]
        progress: f32,

        /// Width in terminal cells (defaults to the content width)
        #[arg(short = 'W', long)]
        width: Option<u16>,

        /// Height in terminal cells
        #[arg(short = 'H', long)]
        height: Option<u16>,

        /// Print symbols only, without colors
        #[arg(long)]
        plain: bool,
    },

    /// Watch simulated playback of an amplitude file
    ///
    /// Space to pause/resume, Left/Right to seek, Escape/q to quit.
    #[command(visible_alias = "p")]
    Play {
        /// Packed amplitude file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Playback duration in seconds (defaults to the configured duration)
        #[arg(short, long, value_name = "SECS")]
        duration: Option<f32>,
    },

    /// Print the width, in device pixels, the widget would ask layout for
    Width {
        /// Packed amplitude file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Width offered by layout, in device pixels
        #[arg(short, long)]
        available: Option<f32>,
    },

    /// Pack 5-bit amplitudes (0-31) into an amplitude file
    ///
    /// Reads whitespace or comma separated values from stdin when none are given.
    Pack {
        /// Amplitude values
        #[arg(value_name = "VALUES")]
        values: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    Logs,

    /// Generate shell completion script
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "barwave", &mut io::stdout());
            return Ok(());
        }
        Commands::Logs => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        Commands::Render {
            file,
            progress,
            width,
            height,
            plain,
        } => {
            commands::handle_render(
                &file,
                RenderOptions {
                    progress,
                    width,
                    height,
                    plain,
                },
            )?;
        }
        Commands::Play { file, duration } => {
            commands::handle_play(&file, duration).await?;
        }
        Commands::Width { file, available } => {
            commands::handle_width(&file, available)?;
        }
        Commands::Pack { values, output } => {
            commands::handle_pack(values, &output)?;
        }
        Commands::Config => {
            commands::handle_config()?;
        }
        Commands::Completions { .. } | Commands::Logs => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
