//! Payload file server supervisor.
//!
//! Serves the configured directory over HTTP on a background task.
//! The serve loop is not covered by the supervisor lock; its errors
//! are logged and never crash the daemon.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use super::StopOutcome;
use crate::config::Settings;
use crate::{AppError, Result};

/// Bounded wait for in-flight downloads when stopping the server.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

struct FileServerHandle {
    shutdown: CancellationToken,
    serve_task: JoinHandle<()>,
    addr: SocketAddr,
}

/// Guards the single payload file server listener.
#[derive(Default)]
pub struct FileServerSupervisor {
    handle: Mutex<Option<FileServerHandle>>,
}

impl FileServerSupervisor {
    /// Create a supervisor with no running file server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the configured address and serve `file_directory` in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AlreadyRunning` when a server handle exists,
    /// `AppError::InvalidConfig` when the served directory is missing
    /// or not a directory, and `AppError::StartFailed` when the
    /// listener cannot be bound; on failure no handle is stored.
    pub async fn start(&self, settings: &Settings) -> Result<SocketAddr> {
        let mut guard = self.handle.lock().await;
        if guard.is_some() {
            return Err(AppError::AlreadyRunning(
                "file server already running".into(),
            ));
        }

        let dir = settings.file_directory.clone();
        if dir.is_empty() {
            return Err(AppError::InvalidConfig("invalid file directory".into()));
        }
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(AppError::InvalidConfig("invalid file directory".into())),
        }

        let addr: SocketAddr = format!("{}:{}", settings.file_bind, settings.file_port)
            .parse()
            .map_err(|err| AppError::InvalidConfig(format!("invalid file bind address: {err}")))?;
        let listener = TcpListener::bind(addr).await.map_err(|err| {
            AppError::StartFailed(format!("failed to start file server on {addr}: {err}"))
        })?;
        let local_addr = listener.local_addr().map_err(|err| {
            AppError::StartFailed(format!("failed to resolve file server address: {err}"))
        })?;

        let shutdown = CancellationToken::new();
        let serve_ct = shutdown.clone();
        let router = Router::new().fallback_service(ServeDir::new(&dir));

        let serve_task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { serve_ct.cancelled().await })
                .await;
            if let Err(err) = result {
                error!(%err, "file server error");
            }
        });

        info!(%local_addr, directory = dir, "file server started");
        *guard = Some(FileServerHandle {
            shutdown,
            serve_task,
            addr: local_addr,
        });
        Ok(local_addr)
    }

    /// Gracefully stop the file server, bounded by [`SHUTDOWN_TIMEOUT`].
    ///
    /// On timeout the serve task is aborted; either way the handle is
    /// released and the service reports stopped. The lock is held
    /// across the wait: a concurrent start must not race the listener
    /// teardown, and status reports running until the stop completes.
    pub async fn stop(&self) -> StopOutcome {
        let mut guard = self.handle.lock().await;
        let Some(handle) = guard.take() else {
            return StopOutcome::NotRunning;
        };

        handle.shutdown.cancel();
        let mut serve_task = handle.serve_task;
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut serve_task).await {
            Ok(Ok(())) => info!(addr = %handle.addr, "file server stopped"),
            Ok(Err(err)) => warn!(%err, "file server task failed during shutdown"),
            Err(_) => {
                warn!(addr = %handle.addr, "file server shutdown timed out; aborting");
                serve_task.abort();
            }
        }
        drop(guard);

        StopOutcome::Stopped
    }

    /// Whether a file server handle currently exists.
    pub async fn status(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    /// Bound address of the running server, if any.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.handle.lock().await.as_ref().map(|h| h.addr)
    }
}
