//! # Cradle Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for cradle: loading,
//! validating, and providing typed access to the declarative description of
//! the one managed container. The configuration lives in a flat key-value
//! TOML file (`cradle.toml`), one key per line, values optionally quoted.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Every key is optional at the deserialization layer; required keys are
//!   promoted by an explicit validation pass so a missing key is reported by
//!   name (`MissingRequiredKey`) rather than as a serde parse message.
//! - Paths are expanded (`~` to home directory) before use.
//! - The resulting `Config` value is immutable and passed explicitly into
//!   every component; no ambient process state.
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit path given via `--config`
//! 2. `cradle.toml` in the current directory or its ancestors (the search
//!    stops at a `.git` boundary)
//!
//! ## Examples
//!
//! ```toml
//! container_name = "mydb"
//! image = "registry.example.com/db:21.3"
//! host_port = 1521
//! volume_type = "VOLUME"
//!
//! [env]
//! DB_PASSWORD = "secret"
//! ```
//!
//! ```rust
//! let cfg = config::load(args.config.as_deref())?;
//! println!("managing container '{}'", cfg.container_name);
//! ```
//!
//! The configuration is loaded once per command execution and passed to the
//! modules that need it.
//!
use crate::core::error::{CradleError, Result};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Default name of the configuration file searched for in the current
/// directory and its ancestors.
pub const CONFIG_FILENAME: &str = "cradle.toml";

/// Validated, immutable configuration for the managed container.
///
/// Required keys (`container_name`, `image`, `host_port`) are plain fields;
/// optional keys are `Option` fields or carry documented defaults.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    /// Name of the managed container (unique key in the runtime's namespace).
    pub container_name: String,
    /// Image reference to pull and run (e.g., "registry.example.com/db:21.3").
    pub image: String,
    /// Host port published for the container's service port.
    pub host_port: u16,
    /// Service port inside the container. Defaults to `host_port`.
    pub container_port: u16,
    /// Persistence strategy token: "VOLUME", "HOST_DIR", or unset/other for
    /// no persistence. Interpreted by the volume policy, not here.
    pub volume_type: Option<String>,
    /// Host directory to bind-mount when `volume_type = "HOST_DIR"`.
    /// Tilde-expanded during load.
    pub host_data_path: Option<String>,
    /// Mount target inside the container for the data volume.
    pub data_dir: String,
    /// Memory limit for the container, in megabytes.
    pub memory_mb: Option<i64>,
    /// CPU limit for the container, in (possibly fractional) CPUs.
    pub cpus: Option<f64>,
    /// Seconds to wait for graceful shutdown before the runtime kills the
    /// container.
    pub stop_timeout_secs: u32,
    /// Environment variables injected into the container.
    pub env: HashMap<String, String>,
}

/// Deserialization target where *every* key is optional, so that required-key
/// enforcement happens in `Config::from_raw` with precise error reporting.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)] // Error if unknown keys are in the file
struct RawConfig {
    container_name: Option<String>,
    image: Option<String>,
    host_port: Option<u16>,
    container_port: Option<u16>,
    volume_type: Option<String>,
    host_data_path: Option<String>,
    #[serde(default = "default_data_dir")]
    data_dir: String,
    memory_mb: Option<i64>,
    cpus: Option<f64>,
    #[serde(default = "default_stop_timeout")]
    stop_timeout_secs: u32,
    #[serde(default)]
    env: HashMap<String, String>,
}

fn default_data_dir() -> String {
    "/data".to_string()
}
fn default_stop_timeout() -> u32 {
    10
}

/// Loads the configuration, either from an explicit path or by searching for
/// `cradle.toml` upward from the current directory.
///
/// # Errors
///
/// * `CradleError::ConfigFileMissing` - if the explicit path does not exist,
///   or no `cradle.toml` is found during the search.
/// * `CradleError::MissingRequiredKey` - if a required key is absent (or
///   present but empty) after parsing.
/// * `CradleError::Config` - for malformed values.
pub fn load(explicit_path: Option<&Path>) -> Result<Config> {
    let path = match explicit_path {
        Some(p) => {
            if !p.exists() {
                return Err(anyhow!(CradleError::ConfigFileMissing {
                    path: p.display().to_string(),
                }));
            }
            p.to_path_buf()
        }
        None => find_config_path()?.ok_or_else(|| {
            anyhow!(CradleError::ConfigFileMissing {
                path: CONFIG_FILENAME.to_string(),
            })
        })?,
    };

    info!("Loading configuration from: {}", path.display());
    let raw = load_raw_from_path(&path)?;
    let mut config = Config::from_raw(raw)?;
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

/// Walks from the current directory toward the filesystem root looking for
/// `cradle.toml`. The search stops at a `.git` directory so one project's
/// configuration never leaks into another.
fn find_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let candidate = path.join(CONFIG_FILENAME);
        if candidate.exists() && candidate.is_file() {
            return Ok(Some(candidate));
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping config search.",
                path.display()
            );
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }
    Ok(None)
}

fn load_raw_from_path(path: &Path) -> Result<RawConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

impl Config {
    /// Promotes a `RawConfig` into a validated `Config`, enforcing the
    /// required keys. An empty value for a required key is as good as absent.
    fn from_raw(raw: RawConfig) -> Result<Self> {
        let container_name = required(raw.container_name, "container_name")?;
        let image = required(raw.image, "image")?;
        let host_port = raw.host_port.ok_or_else(|| missing_key("host_port"))?;

        Ok(Config {
            container_port: raw.container_port.unwrap_or(host_port),
            container_name,
            image,
            host_port,
            volume_type: raw.volume_type,
            host_data_path: raw.host_data_path,
            data_dir: raw.data_dir,
            memory_mb: raw.memory_mb,
            cpus: raw.cpus,
            stop_timeout_secs: raw.stop_timeout_secs,
            env: raw.env,
        })
    }
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing_key(key)),
    }
}

fn missing_key(key: &str) -> anyhow::Error {
    anyhow!(CradleError::MissingRequiredKey {
        key: key.to_string(),
    })
}

fn expand_config_paths(config: &mut Config) {
    if let Some(host_path) = &config.host_data_path {
        let expanded = shellexpand::tilde(host_path).into_owned();
        debug!("Expanded host data path: {}", expanded);
        config.host_data_path = Some(expanded);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.host_port == 0 {
        return Err(anyhow!(CradleError::Config(
            "'host_port' must be a non-zero port number.".to_string()
        )));
    }
    // Container paths must be absolute; the runtime rejects anything else
    // with a much less helpful message.
    if !config.data_dir.starts_with('/') {
        return Err(anyhow!(CradleError::Config(format!(
            "'data_dir' must be an absolute container path, got '{}'.",
            config.data_dir
        ))));
    }
    for key in config.env.keys() {
        if key.is_empty() || key.contains('=') {
            return Err(anyhow!(CradleError::Config(format!(
                "Invalid environment variable name '{}'.",
                key
            ))));
        }
    }
    Ok(())
}
