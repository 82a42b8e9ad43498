//! Pivot proxy subprocess supervisor.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::StopOutcome;
use crate::config::Settings;
use crate::{AppError, Result};

/// Guards the single pivot proxy child process.
#[derive(Debug, Default)]
pub struct ProxySupervisor {
    child: Mutex<Option<Child>>,
}

impl ProxySupervisor {
    /// Create a supervisor with no running proxy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the proxy process with the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AlreadyRunning` when a proxy handle exists,
    /// or `AppError::StartFailed` when the process cannot be spawned;
    /// in the latter case no handle is stored.
    pub async fn start(&self, settings: &Settings) -> Result<()> {
        let mut guard = self.child.lock().await;
        if guard.is_some() {
            return Err(AppError::AlreadyRunning("proxy already running".into()));
        }

        let addr = format!("{}:{}", settings.proxy_bind, settings.proxy_port);
        let child = Command::new(&settings.proxy_binary)
            .args(["-laddr", &addr, "-selfcert"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| AppError::StartFailed(format!("failed to start proxy: {err}")))?;

        info!(
            pid = child.id().unwrap_or(0),
            %addr,
            binary = settings.proxy_binary,
            "pivot proxy started"
        );
        *guard = Some(child);
        Ok(())
    }

    /// Kill the proxy process if one is running.
    ///
    /// The kill is requested under the lock, but the exited child is
    /// reaped by a detached task so stopping never waits on process
    /// exit. Reaping failures are logged, never surfaced.
    pub async fn stop(&self) -> StopOutcome {
        let mut guard = self.child.lock().await;
        let Some(mut child) = guard.take() else {
            return StopOutcome::NotRunning;
        };

        let pid = child.id().unwrap_or(0);
        if let Err(err) = child.start_kill() {
            warn!(pid, %err, "failed to kill proxy process");
        }

        // Fire-and-forget reap to avoid a zombie; no caller waits on it.
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => info!(pid, %status, "pivot proxy reaped"),
                Err(err) => warn!(pid, %err, "failed to reap pivot proxy"),
            }
        });

        StopOutcome::Stopped
    }

    /// Whether a proxy handle currently exists.
    pub async fn status(&self) -> bool {
        self.child.lock().await.is_some()
    }
}
