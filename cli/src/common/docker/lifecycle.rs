//! # Cradle Lifecycle Controller
//!
//! File: cli/src/common/docker/lifecycle.rs
//!
//! ## Overview
//!
//! This module orchestrates the command verbs over the `Runtime` trait. It
//! owns the one real correctness property of the tool: **every verb first
//! queries the observed container state and only requests the transitions
//! that state calls for**, so repeating a verb in the same state produces no
//! additional side effect.
//!
//! ## Architecture
//!
//! States observed: `Absent → Created → Running ⇄ Stopped → Absent` (via
//! remove). Verb mapping:
//!
//! - **`start`**: absent → resolve persistence, ensure host dir, pull,
//!   create, start; created/stopped → start; running → no-op.
//! - **`stop`**: running → stop; anything else → reported no-op.
//! - **`remove`**: best-effort stop (failure logged, not fatal), forced
//!   remove, then — only behind an explicit confirmation that defaults to
//!   "no" — removal of the named volume or recursive deletion of the host
//!   data directory. A declined confirmation is a successful outcome, not an
//!   error.
//! - **`logs`/`exec`**: existence-checked pass-throughs to the runtime's
//!   streaming operations.
//!
//! The controller is generic over `Runtime` and takes the confirmation
//! capability as a parameter, so the tests below drive it against an
//! in-memory runtime with deterministic answers — no daemon, no terminal.
//!
use crate::common::docker::runtime::{ContainerState, CreateSpec, Runtime};
use crate::common::fs;
use crate::common::ui::prompts::Confirm;
use crate::core::{
    config::Config,
    error::{CradleError, Result},
    volume::{self, VolumeSpec},
};
use anyhow::{anyhow, Context};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What `start` did, for user-facing reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The container was created from scratch and started.
    Created { volume: VolumeSpec },
    /// An existing stopped container was started.
    Started,
    /// The container was already running; nothing was done.
    AlreadyRunning,
}

/// What `stop` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// A running container was stopped.
    Stopped,
    /// The container exists but was not running; nothing was done.
    NotRunning,
    /// No container of this name exists; nothing was done.
    Absent,
}

/// What happened to persistent data during `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDisposition {
    /// No persistence was configured; nothing to decide.
    None,
    /// The user declined; the named volume is intact.
    VolumeKept(String),
    /// Confirmed; the named volume was deleted.
    VolumeRemoved(String),
    /// The user declined; the host directory is intact.
    HostDirKept(PathBuf),
    /// Confirmed; the host directory was deleted recursively.
    HostDirRemoved(PathBuf),
}

/// What `remove` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The container was removed; `data` records the persistence decision.
    Removed { data: DataDisposition },
    /// No container of this name exists; nothing was done.
    Absent,
}

/// Brings the managed container to the `Running` state.
///
/// Idempotent: a second invocation observing `Running` performs no pull and
/// no create.
pub async fn start<R: Runtime + ?Sized>(rt: &R, config: &Config) -> Result<StartOutcome> {
    let name = &config.container_name;
    match rt.state(name).await? {
        ContainerState::Running => {
            info!("Container '{}' is already running.", name);
            Ok(StartOutcome::AlreadyRunning)
        }
        ContainerState::Stopped | ContainerState::Created => {
            info!("Container '{}' exists but is stopped. Starting...", name);
            rt.start(name)
                .await
                .with_context(|| format!("Failed to start stopped container '{}'", name))?;
            Ok(StartOutcome::Started)
        }
        ContainerState::Absent => {
            info!(
                "Container '{}' not found. Creating from image '{}'...",
                name, config.image
            );
            let volume = volume::resolve(config)?;
            match &volume {
                VolumeSpec::None => {
                    warn!("No persistence configured: container data will not survive removal.")
                }
                VolumeSpec::HostDir(path) => {
                    // Idempotent creation; the engine refuses to bind a
                    // missing source directory.
                    fs::io::ensure_dir_exists(path).with_context(|| {
                        format!("Failed to prepare host data directory {:?}", path)
                    })?;
                }
                VolumeSpec::Named(_) => {}
            }

            rt.pull_image(&config.image).await?;
            let spec = CreateSpec::from_config(config, volume.clone());
            rt.create(&spec).await?;
            rt.start(name)
                .await
                .with_context(|| format!("Failed to start newly created container '{}'", name))?;
            Ok(StartOutcome::Created { volume })
        }
    }
}

/// Stops the managed container if it is running; otherwise reports the
/// no-op without touching the runtime.
pub async fn stop<R: Runtime + ?Sized>(rt: &R, config: &Config) -> Result<StopOutcome> {
    let name = &config.container_name;
    match rt.state(name).await? {
        ContainerState::Absent => {
            info!("Container '{}' not found, nothing to stop.", name);
            Ok(StopOutcome::Absent)
        }
        ContainerState::Running => {
            rt.stop(name, Some(config.stop_timeout_secs)).await?;
            Ok(StopOutcome::Stopped)
        }
        _ => {
            info!("Container '{}' is not running, nothing to stop.", name);
            Ok(StopOutcome::NotRunning)
        }
    }
}

/// Reports the observed container state without changing anything.
pub async fn status<R: Runtime + ?Sized>(rt: &R, name: &str) -> Result<ContainerState> {
    rt.state(name).await
}

/// Streams the container's logs until the stream ends or the user
/// interrupts.
pub async fn logs<R: Runtime + ?Sized>(
    rt: &R,
    name: &str,
    follow: bool,
    tail: Option<&str>,
) -> Result<()> {
    if !rt.exists(name).await? {
        return Err(anyhow!(CradleError::ContainerNotFound {
            name: name.to_string()
        }));
    }
    rt.stream_logs(name, follow, tail).await
}

/// Opens an interactive session in the running container; returns the
/// remote command's exit code.
pub async fn exec<R: Runtime + ?Sized>(rt: &R, name: &str, cmd: &[String]) -> Result<i64> {
    match rt.state(name).await? {
        ContainerState::Absent => Err(anyhow!(CradleError::ContainerNotFound {
            name: name.to_string()
        })),
        ContainerState::Running => rt.exec_interactive(name, cmd).await,
        _ => Err(anyhow!(CradleError::RuntimeCommand {
            verb: "exec".to_string(),
            detail: format!(
                "container '{}' is not running; run 'cradle start' first",
                name
            ),
        })),
    }
}

/// Removes the managed container and, behind confirmation, its persistent
/// data.
///
/// The stop before removal is best-effort: a failure is logged and removal
/// proceeds with force, so a wedged container cannot leave the verb
/// half-done. The data-removal prompt defaults to "no": any non-affirmative
/// answer keeps the volume or directory and the verb still succeeds.
pub async fn remove<R: Runtime + ?Sized>(
    rt: &R,
    config: &Config,
    confirm: &mut dyn Confirm,
) -> Result<RemoveOutcome> {
    let name = &config.container_name;
    if !rt.exists(name).await? {
        info!("Container '{}' not found, nothing to remove.", name);
        return Ok(RemoveOutcome::Absent);
    }

    if let Err(e) = rt.stop(name, Some(config.stop_timeout_secs)).await {
        warn!(
            "Failed to stop container '{}' before removal, proceeding anyway: {:#}",
            name, e
        );
    }
    rt.remove(name, true).await?;
    debug!("Container '{}' removed.", name);

    let data = match volume::resolve(config)? {
        VolumeSpec::None => DataDisposition::None,
        VolumeSpec::Named(volume_name) => {
            let question = format!(
                "Remove named volume '{}' and all data it contains?",
                volume_name
            );
            if confirm.confirm(&question)? {
                rt.remove_volume(&volume_name).await?;
                DataDisposition::VolumeRemoved(volume_name)
            } else {
                info!("Volume removal cancelled; '{}' kept.", volume_name);
                DataDisposition::VolumeKept(volume_name)
            }
        }
        VolumeSpec::HostDir(path) => {
            let question = format!(
                "Recursively delete host data directory '{}'?",
                path.display()
            );
            if confirm.confirm(&question)? {
                rt.remove_host_dir(&path).await?;
                DataDisposition::HostDirRemoved(path)
            } else {
                info!("Host directory removal cancelled; {:?} kept.", path);
                DataDisposition::HostDirKept(path)
            }
        }
    };

    Ok(RemoveOutcome::Removed { data })
}

// --- Unit Tests ---
//
// These drive the controller against an in-memory runtime that records every
// call and mimics the engine's state machine, plus a deterministic
// confirmation answer. This covers the idempotency and confirmation-gating
// properties without a Docker daemon.
#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// In-memory `Runtime`: one container, one optional named volume.
    struct FakeRuntime {
        state: Mutex<ContainerState>,
        volume_present: Mutex<bool>,
        calls: Mutex<Vec<String>>,
        fail_stop: bool,
    }

    impl FakeRuntime {
        fn with_state(state: ContainerState) -> Self {
            FakeRuntime {
                state: Mutex::new(state),
                volume_present: Mutex::new(true),
                calls: Mutex::new(Vec::new()),
                fail_stop: false,
            }
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn current_state(&self) -> ContainerState {
            *self.state.lock().unwrap()
        }
    }

    #[async_trait]
    impl Runtime for FakeRuntime {
        async fn state(&self, _name: &str) -> Result<ContainerState> {
            self.record("state");
            Ok(self.current_state())
        }

        async fn pull_image(&self, _image: &str) -> Result<()> {
            self.record("pull");
            Ok(())
        }

        async fn create(&self, _spec: &CreateSpec) -> Result<()> {
            self.record("create");
            *self.state.lock().unwrap() = ContainerState::Created;
            Ok(())
        }

        async fn start(&self, _name: &str) -> Result<()> {
            self.record("start");
            *self.state.lock().unwrap() = ContainerState::Running;
            Ok(())
        }

        async fn stop(&self, _name: &str, _timeout_secs: Option<u32>) -> Result<()> {
            self.record("stop");
            if self.fail_stop {
                return Err(anyhow!(CradleError::RuntimeCommand {
                    verb: "stop".into(),
                    detail: "injected failure".into(),
                }));
            }
            *self.state.lock().unwrap() = ContainerState::Stopped;
            Ok(())
        }

        async fn remove(&self, _name: &str, _force: bool) -> Result<()> {
            self.record("remove");
            *self.state.lock().unwrap() = ContainerState::Absent;
            Ok(())
        }

        async fn stream_logs(&self, _name: &str, _follow: bool, _tail: Option<&str>) -> Result<()> {
            self.record("logs");
            Ok(())
        }

        async fn exec_interactive(&self, _name: &str, _cmd: &[String]) -> Result<i64> {
            self.record("exec");
            Ok(0)
        }

        async fn remove_volume(&self, _name: &str) -> Result<()> {
            self.record("remove_volume");
            *self.volume_present.lock().unwrap() = false;
            Ok(())
        }

        async fn remove_host_dir(&self, path: &Path) -> Result<()> {
            self.record("remove_host_dir");
            fs::io::remove_dir_recursive(path)
        }
    }

    /// Deterministic confirmation, recording how often it was asked.
    struct Answer {
        yes: bool,
        asked: usize,
    }

    impl Answer {
        fn new(yes: bool) -> Self {
            Answer { yes, asked: 0 }
        }
    }

    impl Confirm for Answer {
        fn confirm(&mut self, _question: &str) -> Result<bool> {
            self.asked += 1;
            Ok(self.yes)
        }
    }

    fn test_config() -> Config {
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

    #[tokio::test]
    async fn test_start_absent_pulls_creates_starts() {
        let rt = FakeRuntime::with_state(ContainerState::Absent);
        let cfg = test_config();

        let outcome = start(&rt, &cfg).await.unwrap();
        assert_eq!(
            outcome,
            StartOutcome::Created {
                volume: VolumeSpec::None
            }
        );
        assert_eq!(rt.calls(), vec!["state", "pull", "create", "start"]);
        assert_eq!(rt.current_state(), ContainerState::Running);
    }

    #[tokio::test]
    async fn test_start_is_idempotent_when_running() {
        let rt = FakeRuntime::with_state(ContainerState::Absent);
        let cfg = test_config();

        start(&rt, &cfg).await.unwrap();
        let second = start(&rt, &cfg).await.unwrap();

        assert_eq!(second, StartOutcome::AlreadyRunning);
        // The second invocation must not pull or create again.
        let pulls = rt.calls().iter().filter(|c| *c == "pull").count();
        let creates = rt.calls().iter().filter(|c| *c == "create").count();
        assert_eq!(pulls, 1);
        assert_eq!(creates, 1);
    }

    #[tokio::test]
    async fn test_start_stopped_only_starts() {
        let rt = FakeRuntime::with_state(ContainerState::Stopped);
        let cfg = test_config();

        let outcome = start(&rt, &cfg).await.unwrap();
        assert_eq!(outcome, StartOutcome::Started);
        assert_eq!(rt.calls(), vec!["state", "start"]);
    }

    #[tokio::test]
    async fn test_start_with_host_dir_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let data_path = temp.path().join("oradata");

        let rt = FakeRuntime::with_state(ContainerState::Absent);
        let mut cfg = test_config();
        cfg.volume_type = Some("HOST_DIR".into());
        cfg.host_data_path = Some(data_path.display().to_string());

        let outcome = start(&rt, &cfg).await.unwrap();
        assert_eq!(
            outcome,
            StartOutcome::Created {
                volume: VolumeSpec::HostDir(data_path.clone())
            }
        );
        assert!(data_path.is_dir(), "host data directory must be created");
    }

    #[tokio::test]
    async fn test_stop_running_container() {
        let rt = FakeRuntime::with_state(ContainerState::Running);
        let outcome = stop(&rt, &test_config()).await.unwrap();
        assert_eq!(outcome, StopOutcome::Stopped);
        assert_eq!(rt.current_state(), ContainerState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_absent_performs_no_mutation() {
        let rt = FakeRuntime::with_state(ContainerState::Absent);
        let outcome = stop(&rt, &test_config()).await.unwrap();
        assert_eq!(outcome, StopOutcome::Absent);
        // Only the state query; no stop was issued.
        assert_eq!(rt.calls(), vec!["state"]);
    }

    #[tokio::test]
    async fn test_stop_already_stopped_is_noop() {
        let rt = FakeRuntime::with_state(ContainerState::Stopped);
        let outcome = stop(&rt, &test_config()).await.unwrap();
        assert_eq!(outcome, StopOutcome::NotRunning);
        assert_eq!(rt.calls(), vec!["state"]);
    }

    #[tokio::test]
    async fn test_remove_declined_keeps_volume() {
        let rt = FakeRuntime::with_state(ContainerState::Running);
        let mut cfg = test_config();
        cfg.volume_type = Some("VOLUME".into());
        let mut answer = Answer::new(false);

        let outcome = remove(&rt, &cfg, &mut answer).await.unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Removed {
                data: DataDisposition::VolumeKept("mydb-data".into())
            }
        );
        assert_eq!(answer.asked, 1);
        assert!(
            *rt.volume_present.lock().unwrap(),
            "declined confirmation must leave the volume intact"
        );
        assert_eq!(rt.current_state(), ContainerState::Absent);
    }

    #[tokio::test]
    async fn test_remove_confirmed_removes_volume() {
        let rt = FakeRuntime::with_state(ContainerState::Running);
        let mut cfg = test_config();
        cfg.volume_type = Some("VOLUME".into());
        let mut answer = Answer::new(true);

        let outcome = remove(&rt, &cfg, &mut answer).await.unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Removed {
                data: DataDisposition::VolumeRemoved("mydb-data".into())
            }
        );
        assert!(!*rt.volume_present.lock().unwrap());
    }

    #[tokio::test]
    async fn test_remove_confirmed_deletes_host_dir() {
        let temp = tempfile::tempdir().unwrap();
        let data_path = temp.path().join("oradata");
        std::fs::create_dir_all(data_path.join("nested")).unwrap();
        std::fs::write(data_path.join("nested/file.dbf"), "x").unwrap();

        let rt = FakeRuntime::with_state(ContainerState::Running);
        let mut cfg = test_config();
        cfg.volume_type = Some("HOST_DIR".into());
        cfg.host_data_path = Some(data_path.display().to_string());
        let mut answer = Answer::new(true);

        let outcome = remove(&rt, &cfg, &mut answer).await.unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Removed {
                data: DataDisposition::HostDirRemoved(data_path.clone())
            }
        );
        assert!(!data_path.exists(), "directory must be gone afterward");
    }

    #[tokio::test]
    async fn test_remove_proceeds_when_stop_fails() {
        let mut rt = FakeRuntime::with_state(ContainerState::Running);
        rt.fail_stop = true;
        let mut answer = Answer::new(false);

        let outcome = remove(&rt, &test_config(), &mut answer).await.unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Removed {
                data: DataDisposition::None
            }
        );
        assert_eq!(rt.current_state(), ContainerState::Absent);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let rt = FakeRuntime::with_state(ContainerState::Absent);
        let mut answer = Answer::new(true);

        let outcome = remove(&rt, &test_config(), &mut answer).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Absent);
        assert_eq!(answer.asked, 0, "no prompt for an absent container");
        assert_eq!(rt.calls(), vec!["state"]);
    }

    #[tokio::test]
    async fn test_exec_requires_running_container() {
        let rt = FakeRuntime::with_state(ContainerState::Stopped);
        let err = exec(&rt, "mydb", &["bash".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("exec"));

        let rt = FakeRuntime::with_state(ContainerState::Absent);
        let err = exec(&rt, "mydb", &["bash".to_string()]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CradleError>(),
            Some(CradleError::ContainerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_logs_requires_existing_container() {
        let rt = FakeRuntime::with_state(ContainerState::Absent);
        let err = logs(&rt, "mydb", true, None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CradleError>(),
            Some(CradleError::ContainerNotFound { .. })
        ));

        let rt = FakeRuntime::with_state(ContainerState::Running);
        logs(&rt, "mydb", true, Some("100")).await.unwrap();
    }
}
