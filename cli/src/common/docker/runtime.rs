//! # Cradle Runtime Abstraction
//!
//! File: cli/src/common/docker/runtime.rs
//!
//! ## Overview
//!
//! This module defines the `Runtime` trait: the seam between the lifecycle
//! controller and the external container engine. Every operation the
//! controller needs — existence and state queries, image pull, create,
//! start, stop, remove, log streaming, interactive exec, and destructive
//! data removal — is expressed here as an async method returning a typed
//! result.
//!
//! The production implementation (`client::DockerRuntime`) talks to the
//! Docker Engine API; tests implement the trait over an in-memory state
//! machine, which is what makes the controller's idempotency and
//! confirmation-gating behavior testable without a daemon.
//!
//! ## Architecture
//!
//! - `ContainerState`: the observed lifecycle state of the managed
//!   container. The engine owns the container; we only observe and request
//!   transitions.
//! - `CreateSpec`: a typed request object bundling everything a container
//!   creation needs (image, name, port mapping, resource limits, environment
//!   variables, mount source and target). Built once from the configuration
//!   and passed whole — never reassembled ad hoc per call site.
//! - `Runtime`: the operations themselves. Each call awaits the underlying
//!   engine call to completion before returning.
//!
use crate::core::{config::Config, error::Result, volume::VolumeSpec};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Observed lifecycle state of the managed container.
///
/// Transitions requested by the controller follow
/// `Absent → Created → Running ⇄ Stopped → Absent` (via remove).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// No container of this name exists in the engine's namespace.
    Absent,
    /// Created but never started.
    Created,
    /// Currently running (includes paused/restarting engine states).
    Running,
    /// Exists but is not running.
    Stopped,
}

impl ContainerState {
    /// Human-readable label used in status output.
    pub fn describe(&self) -> &'static str {
        match self {
            ContainerState::Absent => "absent",
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Stopped => "stopped",
        }
    }
}

/// Typed request object for container creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSpec {
    /// Container name, unique in the engine's namespace.
    pub name: String,
    /// Image reference to run.
    pub image: String,
    /// Host port published for the service.
    pub host_port: u16,
    /// Service port inside the container.
    pub container_port: u16,
    /// Environment variables injected into the container.
    pub env: HashMap<String, String>,
    /// Memory limit in megabytes.
    pub memory_mb: Option<i64>,
    /// CPU limit in (possibly fractional) CPUs.
    pub cpus: Option<f64>,
    /// Mount source for the data directory.
    pub volume: VolumeSpec,
    /// Mount target inside the container.
    pub data_dir: String,
}

impl CreateSpec {
    /// Builds the creation request from the loaded configuration and the
    /// resolved persistence strategy.
    pub fn from_config(config: &Config, volume: VolumeSpec) -> Self {
        CreateSpec {
            name: config.container_name.clone(),
            image: config.image.clone(),
            host_port: config.host_port,
            container_port: config.container_port,
            env: config.env.clone(),
            memory_mb: config.memory_mb,
            cpus: config.cpus,
            volume,
            data_dir: config.data_dir.clone(),
        }
    }
}

/// Abstraction over the external container engine.
///
/// Implementations translate each engine call's outcome into the typed
/// result surface the controller branches on. Idempotency conventions:
/// "already in the requested state" responses are success for `start` and
/// `stop`, and removing something already absent is success for `remove`
/// and `remove_volume`.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Whether a container of this name exists (in any state).
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.state(name).await? != ContainerState::Absent)
    }

    /// Observed lifecycle state; `Absent` if the engine has no such name.
    async fn state(&self, name: &str) -> Result<ContainerState>;

    /// Pulls the image, streaming progress to the user.
    async fn pull_image(&self, image: &str) -> Result<()>;

    /// Creates the container described by `spec` without starting it.
    async fn create(&self, spec: &CreateSpec) -> Result<()>;

    /// Starts a created or stopped container.
    async fn start(&self, name: &str) -> Result<()>;

    /// Stops a running container, waiting `timeout_secs` for graceful
    /// shutdown before the engine kills it.
    async fn stop(&self, name: &str, timeout_secs: Option<u32>) -> Result<()>;

    /// Removes the container. With `force`, a still-running container is
    /// killed and removed rather than producing a conflict.
    async fn remove(&self, name: &str, force: bool) -> Result<()>;

    /// Attaches to the container's log stream and forwards it to stdout
    /// until the stream ends or the user interrupts.
    async fn stream_logs(&self, name: &str, follow: bool, tail: Option<&str>) -> Result<()>;

    /// Runs `cmd` in an interactive TTY session inside the container,
    /// blocking until the remote command exits. Returns its exit code.
    async fn exec_interactive(&self, name: &str, cmd: &[String]) -> Result<i64>;

    /// Deletes a named volume. Destructive; callers gate this behind
    /// explicit confirmation.
    async fn remove_volume(&self, name: &str) -> Result<()>;

    /// Recursively deletes a bind-mounted host directory. Destructive;
    /// callers gate this behind explicit confirmation.
    async fn remove_host_dir(&self, path: &Path) -> Result<()>;
}
