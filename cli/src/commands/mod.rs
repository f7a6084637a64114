//! # Cradle Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per verb of the command surface. Each module defines a clap
//! arguments struct and an async `handle_*` function that loads the
//! configuration, connects to the engine, and delegates to the lifecycle
//! controller.
//!
//! ## Architecture
//!
//! The verbs map onto the container's lifecycle:
//!
//! - `start`: bring the container to `Running` (create + pull if needed)
//! - `stop`: stop it gracefully if running
//! - `status`: report observed state and port mapping
//! - `logs`: stream log output until interrupted
//! - `exec`: open an interactive session
//! - `rm`: remove the container and, behind confirmation, its data
//!
pub mod exec;
pub mod logs;
pub mod rm;
pub mod start;
pub mod status;
pub mod stop;
