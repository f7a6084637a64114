//! # Cradle Volume Policy
//!
//! File: cli/src/core/volume.rs
//!
//! ## Overview
//!
//! This module decides the persistence strategy for the managed container's
//! data and produces the mount source specification. It is a pure function of
//! the loaded configuration: the same `Config` always yields the same
//! `VolumeSpec`, and nothing here touches the filesystem or the runtime.
//!
//! ## Architecture
//!
//! Three strategies, selected by the `volume_type` key:
//! - `"VOLUME"` → a named volume managed by the runtime, named
//!   `<container_name>-data`, outliving container removal.
//! - `"HOST_DIR"` → a bind mount of `host_data_path`; the key must be set.
//! - unset or any other token → no persistence. The caller is responsible
//!   for surfacing the "data will not persist" warning to the user.
//!
//! Matching on the strategy token is case-insensitive. Directory creation for
//! the `HostDir` case is *not* done here (resolution stays pure); the
//! lifecycle controller ensures the path exists before mounting.
//!
use crate::core::{
    config::Config,
    error::{CradleError, Result},
};
use anyhow::anyhow;
use std::path::PathBuf;

/// Mount source for the container's data directory, derived once per
/// invocation from the configuration and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeSpec {
    /// No persistence: container data is lost on removal.
    None,
    /// A runtime-managed named volume.
    Named(String),
    /// A bind-mounted host directory.
    HostDir(PathBuf),
}

impl VolumeSpec {
    /// True for the strategies that keep data across container removal.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, VolumeSpec::None)
    }
}

/// Resolves the persistence strategy from the configuration.
///
/// # Errors
///
/// * `CradleError::MissingRequiredKey` - if `volume_type = "HOST_DIR"` but
///   `host_data_path` is unset or empty.
pub fn resolve(config: &Config) -> Result<VolumeSpec> {
    match config
        .volume_type
        .as_deref()
        .map(|t| t.trim().to_ascii_uppercase())
        .as_deref()
    {
        Some("VOLUME") => Ok(VolumeSpec::Named(format!(
            "{}-data",
            config.container_name
        ))),
        Some("HOST_DIR") => match config.host_data_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Ok(VolumeSpec::HostDir(PathBuf::from(path))),
            _ => Err(anyhow!(CradleError::MissingRequiredKey {
                key: "host_data_path".to_string(),
            })),
        },
        // Unset or unrecognized token: no persistence. Not an error.
        _ => Ok(VolumeSpec::None),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            container_name: "mydb".into(),
            image: "db:21.3".into(),
            host_port: 1521,
            container_port: 1521,
            data_dir: "/data".into(),
            stop_timeout_secs: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_named_volume_from_container_name() {
        let mut cfg = base_config();
        cfg.volume_type = Some("VOLUME".into());
        assert_eq!(
            resolve(&cfg).unwrap(),
            VolumeSpec::Named("mydb-data".into())
        );
    }

    #[test]
    fn test_strategy_token_is_case_insensitive() {
        let mut cfg = base_config();
        cfg.volume_type = Some("volume".into());
        assert_eq!(
            resolve(&cfg).unwrap(),
            VolumeSpec::Named("mydb-data".into())
        );
    }

    #[test]
    fn test_host_dir_requires_path() {
        let mut cfg = base_config();
        cfg.volume_type = Some("HOST_DIR".into());

        // Unset path fails, naming the missing key.
        let err = resolve(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CradleError>(),
            Some(CradleError::MissingRequiredKey { key }) if key == "host_data_path"
        ));

        // Empty path fails the same way.
        cfg.host_data_path = Some("   ".into());
        assert!(resolve(&cfg).is_err());

        // A real path succeeds.
        cfg.host_data_path = Some("/srv/mydb/data".into());
        assert_eq!(
            resolve(&cfg).unwrap(),
            VolumeSpec::HostDir(PathBuf::from("/srv/mydb/data"))
        );
    }

    #[test]
    fn test_unset_or_unknown_token_means_no_persistence() {
        let cfg = base_config();
        assert_eq!(resolve(&cfg).unwrap(), VolumeSpec::None);

        let mut cfg = base_config();
        cfg.volume_type = Some("TMPFS".into());
        assert_eq!(resolve(&cfg).unwrap(), VolumeSpec::None);
    }

    #[test]
    fn test_resolution_is_pure() {
        let mut cfg = base_config();
        cfg.volume_type = Some("VOLUME".into());
        // Identical input yields identical output across calls.
        assert_eq!(resolve(&cfg).unwrap(), resolve(&cfg).unwrap());
    }

    #[test]
    fn test_persistence_flag() {
        assert!(!VolumeSpec::None.is_persistent());
        assert!(VolumeSpec::Named("x-data".into()).is_persistent());
        assert!(VolumeSpec::HostDir(PathBuf::from("/x")).is_persistent());
    }
}
