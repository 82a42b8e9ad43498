//! Pivot binary installer ("skiddie mode").
//!
//! Downloads the pinned ligolo-ng release tarballs, extracts the
//! `proxy` and `agent` binaries into the per-user install directory,
//! and updates the persisted settings to point at them. Linux only.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::config::{ConfigStore, Settings};
use crate::paths::AppDirs;
use crate::{AppError, Result};

/// Pinned upstream release.
pub const LIGOLO_VERSION: &str = "v0.8.2";
const PROXY_URL: &str = "https://github.com/nicocha30/ligolo-ng/releases/download/v0.8.2/ligolo-ng_proxy_0.8.2_linux_amd64.tar.gz";
const AGENT_URL: &str = "https://github.com/nicocha30/ligolo-ng/releases/download/v0.8.2/ligolo-ng_agent_0.8.2_linux_amd64.tar.gz";

/// Whether the pivot binaries are present and configured.
#[derive(Debug, Clone, Serialize)]
pub struct InstallStatus {
    /// True when both binaries are on disk and configured.
    pub installed: bool,
    /// Configured proxy binary path.
    pub proxy_path: String,
    /// Configured agent binary name.
    pub agent_name: String,
    /// Install directory for downloaded binaries.
    pub install_dir: String,
    /// Why `installed` is false, when it is.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

/// Installer outcome details.
#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
    /// True when the binaries were already installed before this run.
    pub installed_before: bool,
    /// Proxy binary path after the run.
    pub proxy_path: String,
    /// Agent binary name after the run.
    pub agent_name: String,
    /// Human-readable summary.
    pub message: String,
}

/// Check settings and the filesystem for an existing install.
pub async fn check_installed(settings: &Settings, dirs: &AppDirs) -> InstallStatus {
    let install_dir = dirs.install_dir();
    let mut status = InstallStatus {
        installed: false,
        proxy_path: settings.proxy_binary.clone(),
        agent_name: settings.agent_binary.clone(),
        install_dir: install_dir.to_string_lossy().into_owned(),
        reason: String::new(),
    };

    if settings.proxy_binary.is_empty() {
        status.reason = "proxy binary path not set".into();
        return status;
    }
    if !path_exists(Path::new(&settings.proxy_binary)).await {
        status.reason = "proxy binary not found on disk".into();
        return status;
    }
    if !path_exists(&install_dir.join(&settings.agent_binary)).await {
        status.reason = "agent binary not found in install dir".into();
        return status;
    }

    status.installed = true;
    status
}

async fn path_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Download both release tarballs, extract the binaries, and persist
/// the updated settings.
///
/// # Errors
///
/// Returns `AppError::NotImplemented` on non-Linux hosts,
/// `AppError::Io` for download/extraction failures, and propagates
/// settings persistence errors.
pub async fn run_install(store: &ConfigStore, dirs: &AppDirs) -> Result<InstallResult> {
    if !cfg!(target_os = "linux") {
        return Err(AppError::NotImplemented(
            "skiddie mode is supported on Linux only".into(),
        ));
    }

    let settings = store.load(dirs).await?;
    let status = check_installed(&settings, dirs).await;

    let mut result = InstallResult {
        installed_before: status.installed,
        proxy_path: status.proxy_path.clone(),
        agent_name: status.agent_name.clone(),
        message: String::new(),
    };

    if status.installed {
        result.message = "ligolo-ng already installed and configured".into();
        return Ok(result);
    }

    let install_dir = dirs.install_dir();
    fs::create_dir_all(&install_dir).await?;

    let proxy_path = install_dir.join("proxy");
    download_and_extract(PROXY_URL, &install_dir, "proxy")
        .await
        .map_err(|err| AppError::Io(format!("failed to install proxy: {err}")))?;
    download_and_extract(AGENT_URL, &install_dir, "agent")
        .await
        .map_err(|err| AppError::Io(format!("failed to install agent: {err}")))?;

    let mut updated = settings;
    updated.proxy_binary = proxy_path.to_string_lossy().into_owned();
    updated.agent_binary = "agent".into();
    let updated = store.save(updated, dirs).await?;

    info!(version = LIGOLO_VERSION, dir = %install_dir.display(), "ligolo-ng installed");

    result.proxy_path = updated.proxy_binary;
    result.agent_name = updated.agent_binary;
    result.message = "ligolo-ng installed and config updated".into();
    Ok(result)
}

/// Fetch a `.tar.gz` and unpack the first regular member whose base
/// name matches `member`, marking it executable.
async fn download_and_extract(url: &str, dest_dir: &Path, member: &str) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .map_err(|err| AppError::Io(format!("download failed: {err}")))?;
    if !response.status().is_success() {
        return Err(AppError::Io(format!("download failed: {}", response.status())));
    }
    let body = response
        .bytes()
        .await
        .map_err(|err| AppError::Io(format!("download failed: {err}")))?;

    let dest_dir = dest_dir.to_path_buf();
    let member = member.to_owned();
    tokio::task::spawn_blocking(move || extract_member(body.as_ref(), &dest_dir, &member))
        .await
        .map_err(|err| AppError::Io(format!("extraction task panicked: {err}")))?
}

fn extract_member(tarball: &[u8], dest_dir: &Path, member: &str) -> Result<()> {
    let gz = flate2::read::GzDecoder::new(Cursor::new(tarball));
    let mut archive = tar::Archive::new(gz);

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let matches = entry
            .path()?
            .file_name()
            .is_some_and(|name| name == member);
        if !matches {
            continue;
        }

        let target: PathBuf = dest_dir.join(member);
        entry.unpack(&target)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755))?;
        }

        return Ok(());
    }

    Err(AppError::Io(format!("file {member} not found in tar.gz")))
}
