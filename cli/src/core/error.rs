//! # Cradle Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used
//! throughout cradle. It provides a consistent approach to error management
//! with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `CradleError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The variants follow the failure taxonomy of the tool:
//! - Configuration errors (missing file, missing required key, invalid values)
//! - Runtime command failures (per failing verb)
//! - Image pull / container create failures
//! - Filesystem errors
//! - Docker API transport errors
//!
//! Configuration errors are always raised before any runtime call is made;
//! a declined confirmation on `rm` is *not* an error and never surfaces here.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.exists() {
//!     return Err(CradleError::ConfigFileMissing { path: path.display().to_string() })?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the cradle application.
#[derive(Error, Debug)]
pub enum CradleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file '{path}' not found.")]
    ConfigFileMissing { path: String },

    #[error("Required configuration key '{key}' is missing.")]
    MissingRequiredKey { key: String },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Runtime command '{verb}' failed: {detail}")]
    RuntimeCommand { verb: String, detail: String },

    #[error("Failed to pull image '{image}'.")]
    PullFailed { image: String },

    #[error("Failed to create container '{name}'.")]
    CreateFailed { name: String },

    #[error("Container '{name}' not found.")]
    ContainerNotFound { name: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let missing_key = CradleError::MissingRequiredKey {
            key: "image".into(),
        };
        assert_eq!(
            missing_key.to_string(),
            "Required configuration key 'image' is missing."
        );

        let missing_file = CradleError::ConfigFileMissing {
            path: "/tmp/cradle.toml".into(),
        };
        assert_eq!(
            missing_file.to_string(),
            "Configuration file '/tmp/cradle.toml' not found."
        );

        let container_not_found = CradleError::ContainerNotFound {
            name: "test-container".into(),
        };
        assert_eq!(
            container_not_found.to_string(),
            "Container 'test-container' not found."
        );

        let runtime = CradleError::RuntimeCommand {
            verb: "stop".into(),
            detail: "daemon unreachable".into(),
        };
        assert_eq!(
            runtime.to_string(),
            "Runtime command 'stop' failed: daemon unreachable"
        );
    }
}
