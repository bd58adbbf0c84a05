//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// Practice out loud, then watch your reward
#[derive(Parser)]
#[command(name = "practube")]
#[command(version)]
#[command(about = "Practice out loud, then watch your reward")]
#[command(long_about = "Practice out loud, then watch your reward.\n\nSet how many minutes to practice and how many minutes of videos you earn.\nOnly time spent above the loudness threshold counts toward practice.\nOnce enough practice is recorded, finish to open the reward site.\n\nDEFAULT COMMAND:\n    If no command is specified, 'practice' is used by default.\n\nEXAMPLES:\n    # Practice 20 minutes for 10 minutes of videos\n    $ practube -p 20 -r 10\n    \n    # Find the microphone to use\n    $ practube list-devices\n    \n    # Edit configuration file\n    $ practube config")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/practube/practube.toml\n    Logs:               ~/.local/state/practube/practube.log.*"
)]
struct Cli {
    /// Practice minutes to pre-fill (practice default command)
    #[arg(short, long, value_name = "MIN", global = true)]
    practice: Option<f64>,

    /// Reward minutes to pre-fill (practice default command)
    #[arg(short, long, value_name = "MIN", global = true)]
    reward: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a practice session (default)
    ///
    /// Enter durations, practice until the target is reached, press Enter to
    /// finish and open the reward.
    #[command(visible_alias = "p")]
    Practice,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the correct input device in practube.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   practube completions bash > practube.bash
    ///   practube completions zsh > _practube
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "practube", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
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
        None | Some(Commands::Practice) => {
            commands::handle_practice(cli.practice, cli.reward).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn durations_parse_without_subcommand() {
        let cli = Cli::try_parse_from(["practube", "-p", "1.5", "--reward", "10"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.practice, Some(1.5));
        assert_eq!(cli.reward, Some(10.0));
    }

    #[test]
    fn durations_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["practube", "practice", "-p", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Practice)));
        assert_eq!(cli.practice, Some(2.0));
    }
}
