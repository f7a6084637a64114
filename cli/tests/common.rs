//! # Cradle CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared utility functions used across the integration test files. Each
//! `.rs` file in `cli/tests/` (that isn't a module like this one) is
//! compiled as a separate test crate running the real `cradle` binary.
//!

// Allow potentially unused code in this common module, as different test
// files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::PathBuf;

/// Creates an `assert_cmd::Command` pointing at the compiled `cradle`
/// binary for the current test run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn cradle_cmd() -> Command {
    Command::cargo_bin("cradle").expect("Failed to find cradle binary for testing")
}

/// Writes a configuration file with the given content into a fresh
/// temporary directory and returns (dir, path). The directory guard must be
/// kept alive for the duration of the test.
pub fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cradle.toml");
    std::fs::write(&path, content).expect("Failed to write test config");
    (dir, path)
}
