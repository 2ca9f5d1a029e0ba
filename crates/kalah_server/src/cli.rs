//! Command-line interface for kalah.

use clap::{Parser, Subcommand};
use kalah_core::TieBreak;
use std::path::PathBuf;

/// Kalah - six-pit mancala game server
#[derive(Parser, Debug)]
#[command(name = "kalah")]
#[command(about = "Kalah game server and offline replayer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep games in memory instead of SQLite
        #[arg(long)]
        in_memory: bool,
    },

    /// Replay a list of 1-based pit positions and print each board
    Play {
        /// Stones per pit at the start
        #[arg(short, long, default_value = "6")]
        stones: u32,

        /// How level houses are scored (draw or second_player)
        #[arg(long, default_value = "draw")]
        tie_break: TieBreak,

        /// Positions to play, in order
        #[arg(required = true, allow_negative_numbers = true)]
        positions: Vec<i32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play() {
        let cli = Cli::parse_from(["kalah", "play", "--tie-break", "second_player", "1", "2"]);
        match cli.command {
            Command::Play {
                stones,
                tie_break,
                positions,
            } => {
                assert_eq!(stones, 6);
                assert_eq!(tie_break, TieBreak::SecondPlayer);
                assert_eq!(positions, vec![1, 2]);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["kalah", "serve", "--in-memory"]);
        match cli.command {
            Command::Serve {
                config,
                host,
                port,
                in_memory,
            } => {
                assert!(config.is_none());
                assert!(host.is_none());
                assert!(port.is_none());
                assert!(in_memory);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_play_requires_positions() {
        assert!(Cli::try_parse_from(["kalah", "play"]).is_err());
    }
}
