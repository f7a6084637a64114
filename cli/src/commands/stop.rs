//! # Cradle Stop Handler
//!
//! File: cli/src/commands/stop.rs
//!
//! ## Overview
//!
//! This module implements the `cradle stop` verb. A running container is
//! stopped gracefully with a configurable timeout; a stopped or absent
//! container is a reported no-op, not an error.
//!
//! ## Usage
//!
//! ```bash
//! # Stop with the configured timeout (default 10 seconds)
//! cradle stop
//!
//! # Give the container 30 seconds to shut down cleanly
//! cradle stop --time 30
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

/// # Stop Arguments (`StopArgs`)
#[derive(Parser, Debug)]
#[command(about = "Stop the managed container")]
pub struct StopArgs {
    /// Seconds to wait for graceful shutdown before the runtime kills the
    /// container. Overrides `stop_timeout_secs` from the configuration.
    #[arg(long, short)]
    time: Option<u32>,
}

/// Handler for `cradle stop`.
pub async fn handle_stop(args: StopArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling stop command...");
    debug!("Stop args: {:?}", args);

    let mut cfg = config::load(config_path).context("Failed to load cradle configuration")?;
    if let Some(time) = args.time {
        cfg.stop_timeout_secs = time;
    }

    let rt = DockerRuntime::connect().await?;
    match lifecycle::stop(&rt, &cfg).await? {
        lifecycle::StopOutcome::Stopped => {
            println!("Container '{}' stopped.", cfg.container_name);
        }
        lifecycle::StopOutcome::NotRunning => {
            println!(
                "Container '{}' is not running; nothing to stop.",
                cfg.container_name
            );
        }
        lifecycle::StopOutcome::Absent => {
            println!("Container '{}' not found; nothing to stop.", cfg.container_name);
        }
    }
    Ok(())
}
