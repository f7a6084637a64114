//! # Cradle Filesystem Helpers
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small filesystem operations used by the lifecycle controller: idempotent
//! directory creation for host-directory mounts, and recursive removal for
//! the destructive `rm` path. Both wrap `std::fs` with the application's
//! error types and contextual messages.
//!
use crate::core::error::{CradleError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function attempts to create the
/// directory, including any necessary parent directories (similar to
/// `mkdir -p`). If the path already exists but is not a directory (e.g.,
/// it's a file), an error is returned.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(CradleError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Recursively removes a directory and everything beneath it.
///
/// A path that does not exist is treated as success (the desired state is
/// absence). A path that exists but is not a directory is refused: this
/// function is only ever pointed at a configured data directory and must not
/// delete arbitrary files.
pub fn remove_dir_recursive(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!("Directory {:?} already absent, nothing to remove.", path);
        return Ok(());
    }
    if !path.is_dir() {
        anyhow::bail!(CradleError::FileSystem(format!(
            "Refusing to remove {:?}: not a directory.",
            path
        )));
    }
    fs::remove_dir_all(path).with_context(|| format!("Failed to remove directory {:?}", path))?;
    info!("Removed directory: {:?}", path);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_and_is_idempotent() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("a/b/c");

        ensure_dir_exists(&target).unwrap();
        assert!(target.is_dir());

        // Second call is a no-op.
        ensure_dir_exists(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("not_a_dir");
        fs::write(&file_path, "").unwrap();

        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not a directory"));
    }

    #[test]
    fn test_remove_dir_recursive() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("data");
        fs::create_dir_all(target.join("nested")).unwrap();
        fs::write(target.join("nested/file.dbf"), "x").unwrap();

        remove_dir_recursive(&target).unwrap();
        assert!(!target.exists(), "directory must be gone afterward");

        // Absent path is success.
        remove_dir_recursive(&target).unwrap();
    }

    #[test]
    fn test_remove_dir_recursive_refuses_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("plain_file");
        fs::write(&file_path, "").unwrap();

        assert!(remove_dir_recursive(&file_path).is_err());
        assert!(file_path.exists(), "file must be left untouched");
    }
}
