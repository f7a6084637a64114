//! # Cradle Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! This module serves as the root for shared utility modules used throughout
//! the cradle CLI. It separates cross-cutting infrastructure from
//! command-specific logic (`commands::`) and core configuration/error
//! handling (`core::`).
//!
//! ## Architecture
//!
//! - **`docker`**: the container-engine interface — runtime trait, bollard
//!   client, and the lifecycle controller.
//! - **`fs`**: filesystem operations (idempotent directory creation,
//!   recursive removal).
//! - **`ui`**: terminal interaction, currently the confirmation prompt that
//!   gates destructive operations.
//!
pub mod docker;
pub mod fs;
pub mod ui;
