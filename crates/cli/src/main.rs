//! respctl - Respira Device Control CLI
//!
//! Command-line interface for the firmware update subsystem: apply a staged
//! candidate image, restore the backup, or check integrity, each as a single
//! process invocation with a one-line summary and a stable exit code.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::CommandContext;

#[derive(Parser)]
#[command(name = "respctl")]
#[command(about = "Respira Device Control CLI - Manage device firmware slots and updates")]
#[command(version)]
#[command(long_about = "
respctl drives the Respira firmware update subsystem. An update backs up the
installed image, writes the staged candidate, validates the result and rolls
back automatically when validation fails. Exit codes are stable per failure
class; use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "RESPCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the firmware slot files (overrides the config)
    #[arg(long, global = true)]
    firmware_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the staged candidate image to the installed slot
    Update,

    /// Restore the backup image into the installed slot
    Rollback,

    /// Check installed firmware integrity without modifying any slot
    Validate,

    /// Show presence, size and digest of each firmware slot
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("respctl={log_level},respira_firmware_update={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match execute_command(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            std::process::exit(error::exit_code(&e));
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    let ctx = CommandContext {
        config: cli.config.clone(),
        firmware_dir: cli.firmware_dir.clone(),
        json: cli.json,
    };

    match &cli.command {
        Commands::Update => commands::update(&ctx).await,
        Commands::Rollback => commands::rollback(&ctx).await,
        Commands::Validate => commands::validate(&ctx).await,
        Commands::Status => commands::status(&ctx).await,
    }
}
