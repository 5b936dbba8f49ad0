//! CLI definitions for termreplay
//!
//! This module contains the clap CLI structure, shared between the binary
//! and the xtask man page generator.

use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{Args, Parser, Subcommand};

use crate::recording::ContainerFormat;

/// Version with build metadata, e.g. `0.1.0 (3f2a9c1, built 2026-10-18)`.
pub fn long_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let date = env!("TERMREPLAY_BUILD_DATE");
        match option_env!("VERGEN_GIT_SHA") {
            Some(sha) => format!("{} ({}, built {})", env!("CARGO_PKG_VERSION"), sha, date),
            None => format!("{} (built {})", env!("CARGO_PKG_VERSION"), date),
        }
    })
}

#[derive(Parser)]
#[command(name = "termreplay")]
#[command(about = "Decode and replay recorded remote terminal sessions")]
#[command(version, long_version = long_version())]
#[command(after_help = "\x1b[1mExamples:\x1b[0m
  termreplay play session.html            Replay an exported session
  termreplay play session.json --speed 2  Replay at double speed
  termreplay check session.html --secret hunter2
                                          Verify a secret never shows up
  termreplay convert session.json -o session.cast
                                          Export to asciicast v3")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Recording input shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Input {
    /// Recording file (JSON array, line-delimited records or HTML export)
    pub file: PathBuf,

    /// Container format (defaults to the config value, usually auto)
    #[arg(long, value_enum)]
    pub format: Option<ContainerFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recording in the terminal
    #[command(long_about = "Replay a recording in the terminal at recorded pace.

Controls:
  space        play / pause (restarts a finished replay)
  , . ← →      seek backward / forward
  Home End     jump to start / end
  + -          change speed
  q Esc        quit")]
    Play {
        #[command(flatten)]
        input: Input,

        /// Speed multiplier
        #[arg(long, short)]
        speed: Option<f64>,

        /// Longest wait between two frames, in seconds
        #[arg(long, short = 'i', value_name = "SECS")]
        idle_limit: Option<f64>,
    },

    /// Show frame counts, duration and terminal size
    Info {
        #[command(flatten)]
        input: Input,
    },

    /// Fail when a secret shows up in the replayed output
    #[command(long_about = "Scan the replayed output for secrets.

Exits with status 1 when any secret occurs in the output stream, or when
the recording has no visible output at all. Secrets split across frames
are found as well.")]
    Check {
        #[command(flatten)]
        input: Input,

        /// Secret to look for (repeatable)
        #[arg(long = "secret", short = 'S', required = true, value_name = "TEXT")]
        secrets: Vec<String>,
    },

    /// Print the screen contents at a point in time
    Snapshot {
        #[command(flatten)]
        input: Input,

        /// Time in milliseconds (defaults to the end of the recording)
        #[arg(long, value_name = "MS")]
        at: Option<u64>,
    },

    /// Convert a recording to asciicast v3
    Convert {
        #[command(flatten)]
        input: Input,

        /// Output file
        #[arg(long, short)]
        output: PathBuf,

        /// Title written to the asciicast header
        #[arg(long)]
        title: Option<String>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Open configuration file in $EDITOR
    Edit,
    /// Print the configuration file path
    Path,
}
