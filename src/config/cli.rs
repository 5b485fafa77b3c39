//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// netwatch-bridge: connectivity change bridge
///
/// Replays connectivity scenarios through an observation session and
/// reports the interface-change notifications it forwards.
#[derive(Debug, Parser)]
#[command(name = "netwatch-bridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for netwatch-bridge
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a scenario file against a simulated connectivity service
    Replay(ReplayArgs),

    /// Generate a scenario template
    Init {
        /// Output path for the scenario file
        #[arg(long, short, default_value = defaults::SCENARIO_FILE)]
        output: PathBuf,
    },
}

/// Arguments for the `replay` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Path to the scenario TOML file
    pub scenario: PathBuf,

    /// Replay without a connectivity service, regardless of the scenario
    #[arg(long = "no-service")]
    pub no_service: bool,

    /// Print the replay report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
