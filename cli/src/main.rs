//! # Cradle Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the cradle CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the verb handlers
//!
//! ## Architecture
//!
//! The application follows a modular command structure:
//! - Each verb (`start`, `stop`, `status`, `logs`, `exec`, `rm`) is a variant
//!   in the `Commands` enum, handled in its module under `commands::`
//! - All errors are propagated to this level for consistent reporting
//!
//! Exit codes: 0 on success or a graceful no-op (including a declined
//! confirmation); 1 on configuration errors, unknown verbs, or any
//! underlying runtime command failure.
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! cradle --help
//!
//! # Start the configured container with debug logging
//! cradle -vv start
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Verb handlers (start, stop, status, logs, exec, rm)
mod common; // Shared utilities (docker, fs, ui)
mod core; // Core infrastructure (config, errors, volume policy)

/// Defines the top-level command-line arguments structure using Clap's
/// derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "cradle",
    about = "Lifecycle manager for one declaratively configured container",
    long_about = "Start, stop, inspect, and remove a single named container\n\
                  described by a cradle.toml configuration file.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file. Defaults to searching for
    /// `cradle.toml` in the current directory and its ancestors.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available verbs.
#[derive(clap::Subcommand, Debug)]
enum Commands {
    Start(commands::start::StartArgs),
    Stop(commands::stop::StopArgs),
    Status(commands::status::StatusArgs),
    Logs(commands::logs::LogsArgs),
    Exec(commands::exec::ExecArgs),
    Rm(commands::rm::RmArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse manually so usage errors (unknown verb, bad flag) exit with
    // status 1; clap's default for those is 2. Help and version keep their
    // conventional successful exit.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Start(args) => commands::start::handle_start(args, config_path).await,
        Commands::Stop(args) => commands::stop::handle_stop(args, config_path).await,
        Commands::Status(args) => commands::status::handle_status(args, config_path).await,
        Commands::Logs(args) => commands::logs::handle_logs(args, config_path).await,
        Commands::Exec(args) => commands::exec::handle_exec(args, config_path).await,
        Commands::Rm(args) => commands::rm::handle_rm(args, config_path).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        // `{:#}` prints the whole context chain on one line, so the root
        // cause (e.g. which key was missing) reaches the user.
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
