//! termreplay CLI entry point

mod commands;

use std::fs::{self, OpenOptions};

use anyhow::Result;
use clap::Parser;

use termreplay::cli::{Cli, Commands, ConfigCommands};
use termreplay::Config;

/// Log to a file so tracing output never mixes with replayed output.
///
/// Logging is best effort: without a writable data directory the
/// subscriber is simply not installed.
fn init_logging() {
    let Ok(path) = Config::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(log_file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .try_init();
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Play {
            input,
            speed,
            idle_limit,
        } => commands::play::handle_play(&input, speed, idle_limit),
        Commands::Info { input } => commands::info::handle_info(&input),
        Commands::Check { input, secrets } => {
            if !commands::check::handle_check(&input, &secrets)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Snapshot { input, at } => commands::snapshot::handle_snapshot(&input, at),
        Commands::Convert {
            input,
            output,
            title,
        } => commands::convert::handle_convert(&input, &output, title),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Edit => commands::config::handle_edit(),
            ConfigCommands::Path => commands::config::handle_path(),
        },
        Commands::Completions { shell } => commands::completions::handle_completions(shell),
    }
}
