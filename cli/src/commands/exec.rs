//! # Cradle Exec Handler
//!
//! File: cli/src/commands/exec.rs
//!
//! ## Overview
//!
//! This module implements the `cradle exec` verb: open an interactive TTY
//! session inside the running container. With no arguments it starts a
//! shell; trailing arguments run as a command instead. The handler blocks
//! until the remote command exits and surfaces a nonzero exit status as a
//! command failure.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive shell in the container
//! cradle exec
//!
//! # Run a specific command interactively
//! cradle exec sqlplus system@localhost
//! ```
//!
use crate::{
    common::docker::{client::DockerRuntime, lifecycle},
    core::{
        config,
        error::{CradleError, Result},
    },
};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};

/// Default command when none is given: an interactive shell.
const DEFAULT_SHELL: &str = "/bin/bash";

/// # Exec Arguments (`ExecArgs`)
#[derive(Parser, Debug)]
#[command(about = "Open an interactive session in the managed container")]
pub struct ExecArgs {
    /// Command and arguments to run inside the container. Defaults to an
    /// interactive shell.
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

/// Handler for `cradle exec`.
pub async fn handle_exec(args: ExecArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling exec command...");
    let cfg = config::load(config_path).context("Failed to load cradle configuration")?;

    let cmd = if args.command.is_empty() {
        vec![DEFAULT_SHELL.to_string()]
    } else {
        args.command
    };

    let rt = DockerRuntime::connect().await?;
    let exit_code = lifecycle::exec(&rt, &cfg.container_name, &cmd).await?;

    if exit_code == 0 {
        Ok(())
    } else {
        warn!(
            "Command {:?} exited with code {} in container '{}'.",
            cmd, exit_code, cfg.container_name
        );
        Err(anyhow!(CradleError::RuntimeCommand {
            verb: "exec".to_string(),
            detail: format!("command exited with status {}", exit_code),
        }))
    }
}
