//! # Cradle Start Handler
//!
//! File: cli/src/commands/start.rs
//!
//! ## Overview
//!
//! This module implements the `cradle start` verb: bring the managed
//! container to the `Running` state. On a first run this resolves the
//! persistence strategy, prepares the host data directory if one is
//! configured, pulls the image, creates the container and starts it; on
//! later runs it starts the stopped container or reports that it is already
//! running. The verb is idempotent — repeating it in the same state performs
//! no additional work.
//!
//! ## Usage
//!
//! ```bash
//! # Create (if needed) and start the configured container
//! cradle start
//!
//! # Same, with an explicit configuration file
//! cradle --config ./db/cradle.toml start
//! ```
//!
use crate::{
    common::docker::{client::DockerRuntime, lifecycle},
    core::{config, error::Result, volume::VolumeSpec},
};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::info;

/// # Start Arguments (`StartArgs`)
///
/// `cradle start` takes no verb-specific options; everything it needs comes
/// from the configuration file.
#[derive(Parser, Debug)]
#[command(about = "Create (if needed) and start the managed container")]
pub struct StartArgs {}

/// Handler for `cradle start`.
///
/// Loads the configuration, connects to the engine, and delegates to the
/// lifecycle controller; the outcome decides the user-facing message.
pub async fn handle_start(_args: StartArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling start command...");
    let cfg = config::load(config_path).context("Failed to load cradle configuration")?;

    let rt = DockerRuntime::connect().await?;
    match lifecycle::start(&rt, &cfg).await? {
        lifecycle::StartOutcome::Created { volume } => {
            match &volume {
                VolumeSpec::None => println!(
                    "Warning: no persistence configured; data in '{}' will not survive removal.",
                    cfg.container_name
                ),
                VolumeSpec::Named(name) => {
                    println!("Data persisted in named volume '{}'.", name)
                }
                VolumeSpec::HostDir(path) => {
                    println!("Data persisted in host directory '{}'.", path.display())
                }
            }
            println!(
                "Container '{}' created and started (port {} -> {}).",
                cfg.container_name, cfg.host_port, cfg.container_port
            );
        }
        lifecycle::StartOutcome::Started => {
            println!("Container '{}' started.", cfg.container_name);
        }
        lifecycle::StartOutcome::AlreadyRunning => {
            println!("Container '{}' is already running.", cfg.container_name);
        }
    }
    Ok(())
}
