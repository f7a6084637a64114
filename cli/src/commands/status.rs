//! # Cradle Status Handler
//!
//! File: cli/src/commands/status.rs
//!
//! ## Overview
//!
//! This module implements the `cradle status` verb: report the observed
//! lifecycle state of the managed container together with its port mapping,
//! without changing anything. An absent container is reported as such and is
//! still a successful command execution.
//!
//! ## Architecture
//!
//! The lifecycle state comes from the controller (`lifecycle::status`); the
//! richer details — container id, image, started-at timestamp, published
//! ports — come from the engine's inspect response and are only printed when
//! the container exists.
//!
use crate::{
    common::docker::{client::DockerRuntime, lifecycle, runtime::ContainerState},
    core::{config, error::Result},
};
use anyhow::Context;
use chrono::{DateTime, Local};
use clap::Parser;
use std::path::Path;
use tracing::info;

/// # Status Arguments (`StatusArgs`)
#[derive(Parser, Debug)]
#[command(about = "Show the state of the managed container")]
pub struct StatusArgs {}

/// Handler for `cradle status`.
pub async fn handle_status(_args: StatusArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling status command...");
    let cfg = config::load(config_path).context("Failed to load cradle configuration")?;

    let rt = DockerRuntime::connect().await?;
    let state = lifecycle::status(&rt, &cfg.container_name).await?;

    if state == ContainerState::Absent {
        println!("Status: container '{}' not found.", cfg.container_name);
        println!("Run 'cradle start' to create and start it.");
        return Ok(());
    }

    let details = rt.inspect(&cfg.container_name).await?;

    println!("--- Status: {} ---", cfg.container_name);
    println!(
        "  ID:         {}",
        details
            .id
            .as_deref()
            .map(|id| &id[..id.len().min(12)])
            .unwrap_or("N/A")
    );
    println!(
        "  Image:      {}",
        details
            .config
            .as_ref()
            .and_then(|c| c.image.as_deref())
            .unwrap_or("N/A")
    );
    println!("  State:      {}", state.describe());

    let container_state = details.state.as_ref();
    if let Some(started_at) = container_state.and_then(|s| s.started_at.as_deref()) {
        // The engine reports a zero-value timestamp for never-started
        // containers; skip those.
        if !started_at.starts_with("0001-01-01") {
            match DateTime::parse_from_rfc3339(started_at) {
                Ok(dt) => println!(
                    "  Started At: {}",
                    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z")
                ),
                Err(_) => println!("  Started At: {}", started_at),
            }
        }
    }
    if let Some(exit_code) = container_state.and_then(|s| s.exit_code) {
        if state != ContainerState::Running && exit_code != 0 {
            println!("  Exit Code:  {}", exit_code);
        }
    }

    // Published ports from the engine when running, otherwise the configured
    // mapping that would apply.
    let port_map = details
        .network_settings
        .as_ref()
        .and_then(|ns| ns.ports.as_ref());
    match port_map {
        Some(ports) if !ports.is_empty() => {
            println!("  Ports:");
            for (container_port, bindings) in ports {
                match bindings {
                    Some(binds) if !binds.is_empty() => {
                        for bind in binds {
                            println!(
                                "    {} -> {}:{}",
                                container_port,
                                bind.host_ip.as_deref().unwrap_or("0.0.0.0"),
                                bind.host_port.as_deref().unwrap_or("?")
                            );
                        }
                    }
                    _ => println!("    {} (not published)", container_port),
                }
            }
        }
        _ => println!(
            "  Ports:      {} -> {} (configured)",
            cfg.host_port, cfg.container_port
        ),
    }

    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_parsing() {
        assert!(StatusArgs::try_parse_from(["status"]).is_ok());
        assert!(StatusArgs::try_parse_from(["status", "--bogus"]).is_err());
    }
}
