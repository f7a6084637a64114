//! # Cradle Docker Connection Helper
//!
//! File: cli/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! This internal utility module provides a single, standardized function,
//! `connect_docker`, responsible for establishing a connection to the local
//! Docker daemon using default settings provided by the `bollard` crate.
//! It centralizes connection logic and error handling for the rest of
//! `common::docker`.
//!
use crate::core::error::{CradleError, Result};
use anyhow::{anyhow, Context};
use bollard::Docker;
use tracing::instrument;

/// Establishes a connection to the local Docker daemon using default settings.
///
/// This attempts to connect to the daemon at its standard location
/// (e.g., `/var/run/docker.sock` on Unix, named pipe on Windows) via
/// `bollard::Docker::connect_with_local_defaults`.
///
/// # Errors
///
/// Returns an `Err` wrapping `CradleError::DockerApi` if the connection
/// fails, with context suggesting the daemon may not be running.
#[instrument]
pub async fn connect_docker() -> Result<Docker> {
    Docker::connect_with_local_defaults()
        .map_err(|e| anyhow!(CradleError::DockerApi { source: e }))
        .context("Failed to connect to Docker daemon. Is it running and accessible?")
}
