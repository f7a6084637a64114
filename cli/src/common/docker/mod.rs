//! # Cradle Docker Utilities (`common::docker`)
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! This module is the interface to the container engine. It is organized in
//! layers: a connection helper, the `Runtime` trait abstracting the engine's
//! command surface, the `bollard`-backed production client, and the lifecycle
//! controller that orchestrates the command verbs over the trait.
//!
//! ## Architecture
//!
//! - **`connect`**: establishing the Docker daemon connection.
//! - **`runtime`**: the `Runtime` trait plus the `ContainerState` and
//!   `CreateSpec` types the controller branches on.
//! - **`client`**: `DockerRuntime`, the production `Runtime` implementation
//!   over the Docker Engine API.
//! - **`lifecycle`**: the verb orchestration (start/stop/status/logs/exec/
//!   remove) with idempotency and confirmation gating; generic over
//!   `Runtime` so it is tested against an in-memory engine.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker::{client::DockerRuntime, lifecycle};
//!
//! # async fn run_example(cfg: &crate::core::config::Config) -> crate::core::error::Result<()> {
//! let rt = DockerRuntime::connect().await?;
//! lifecycle::start(&rt, cfg).await?;
//! # Ok(())
//! # }
//! ```
//!
pub mod client;
pub mod connect;
pub mod lifecycle;
pub mod runtime;
