//! # Cradle Logs Handler
//!
//! File: cli/src/commands/logs.rs
//!
//! ## Overview
//!
//! This module implements the `cradle logs` verb: attach to the managed
//! container's log stream and forward it to stdout until the stream ends or
//! the user interrupts (Ctrl+C). Following is the default — the verb exists
//! to watch the container — and `--lines` limits how much history is
//! replayed first.
//!
//! ## Usage
//!
//! ```bash
//! # Stream logs from the beginning, then follow
//! cradle logs
//!
//! # Replay only the last 100 lines, then follow
//! cradle logs --lines 100
//! ```
//!
use crate::{
    common::docker::{client::DockerRuntime, lifecycle},
    core::{config, error::Result},
};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::{debug, info};

/// # Logs Arguments (`LogsArgs`)
#[derive(Parser, Debug)]
#[command(about = "Stream logs from the managed container")]
pub struct LogsArgs {
    /// Number of lines to show from the end of the logs before following
    /// (e.g. "100"). Defaults to the full log history.
    #[arg(long, short = 'n')]
    lines: Option<String>,
}

/// Handler for `cradle logs`.
pub async fn handle_logs(args: LogsArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling logs command...");
    debug!("Logs args: {:?}", args);

    let cfg = config::load(config_path).context("Failed to load cradle configuration")?;
    let rt = DockerRuntime::connect().await?;

    println!(
        "Streaming logs for '{}' (Ctrl+C to stop)...",
        cfg.container_name
    );
    lifecycle::logs(&rt, &cfg.container_name, true, args.lines.as_deref()).await
}
