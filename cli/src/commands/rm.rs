//! # Cradle Removal Handler
//!
//! File: cli/src/commands/rm.rs
//!
//! ## Overview
//!
//! This module implements the `cradle rm` verb: stop (best-effort) and
//! remove the managed container, then decide what happens to its persistent
//! data. Data removal — a named volume or a bind-mounted host directory —
//! is destructive and therefore gated behind an interactive confirmation
//! that defaults to "no"; declining keeps the data and is still a
//! successful outcome, reported as cancelled.
//!
//! ## Usage
//!
//! ```bash
//! # Remove the container; prompt before touching persistent data
//! cradle rm
//!
//! # Non-interactive: the flag is the explicit consent to delete data
//! cradle rm --yes
//! ```
//!
use crate::{
    common::{
        docker::{client::DockerRuntime, lifecycle},
        ui::prompts::{AssumeYes, Confirm, StdinConfirm},
    },
    core::{config, error::Result},
};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::{debug, info};

/// # Removal Arguments (`RmArgs`)
#[derive(Parser, Debug)]
#[command(about = "Remove the managed container and, on confirmation, its data")]
pub struct RmArgs {
    /// Answer "yes" to the data-removal confirmation instead of prompting.
    /// Passing this flag is the explicit consent to delete persistent data.
    #[arg(long, short)]
    yes: bool,
}

/// Handler for `cradle rm`.
pub async fn handle_rm(args: RmArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling rm command (Yes: {})...", args.yes);
    debug!("Rm args: {:?}", args);

    let cfg = config::load(config_path).context("Failed to load cradle configuration")?;
    let rt = DockerRuntime::connect().await?;

    let mut prompt: Box<dyn Confirm> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    match lifecycle::remove(&rt, &cfg, prompt.as_mut()).await? {
        lifecycle::RemoveOutcome::Absent => {
            println!(
                "Container '{}' not found; nothing to remove.",
                cfg.container_name
            );
        }
        lifecycle::RemoveOutcome::Removed { data } => {
            println!("Removed container '{}'.", cfg.container_name);
            match data {
                lifecycle::DataDisposition::None => {}
                lifecycle::DataDisposition::VolumeRemoved(name) => {
                    println!("Removed named volume '{}'.", name);
                }
                lifecycle::DataDisposition::VolumeKept(name) => {
                    println!("Removal cancelled: named volume '{}' kept.", name);
                }
                lifecycle::DataDisposition::HostDirRemoved(path) => {
                    println!("Removed host data directory '{}'.", path.display());
                }
                lifecycle::DataDisposition::HostDirKept(path) => {
                    println!(
                        "Removal cancelled: host data directory '{}' kept.",
                        path.display()
                    );
                }
            }
        }
    }
    Ok(())
}
