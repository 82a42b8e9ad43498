//! Scout session runner.
//!
//! Executes one remote filesystem enumeration attempt against a host
//! via a protocol backend, normalizes the heterogeneous tool output to
//! a uniform line contract (`FILE|path`, `DENIED|path`), and persists
//! the result artifact under the loot directory.

pub mod smb;
pub mod ssh;
pub mod winrm;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::AppError;

/// Protocol backend used for one scout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    /// Remote `find` over an SSH session (agent/key auth).
    Ssh,
    /// `smbclient` recursive listing of a share.
    Smb,
    /// Declared but not automated.
    Ftp,
    /// `evil-winrm` remote PowerShell walker.
    EvilWinrm,
}

impl Protocol {
    /// Wire name, as used in artifact filenames and results.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Smb => "smb",
            Self::Ftp => "ftp",
            Self::EvilWinrm => "evil-winrm",
        }
    }
}

/// Informational traversal mode; affects naming only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Default mode.
    #[default]
    Fast,
    /// Operator-declared low-noise attempt.
    Stealth,
}

impl Mode {
    /// Wire name, as used in artifact filenames and results.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Stealth => "stealth",
        }
    }
}

// Accepts a missing field or an empty string as "no mode selected".
fn mode_or_empty<'de, D>(deserializer: D) -> Result<Option<Mode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some("fast") => Ok(Some(Mode::Fast)),
        Some("stealth") => Ok(Some(Mode::Stealth)),
        Some(other) => Err(serde::de::Error::unknown_variant(
            other,
            &["fast", "stealth"],
        )),
    }
}

/// Parameters for one enumeration attempt. Constructed per API call,
/// consumed synchronously, never retained.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoutRequest {
    /// Backend selector.
    pub protocol: Protocol,
    /// Target host (mandatory).
    #[serde(default)]
    pub host: String,
    /// Target port; 0 applies the protocol default.
    #[serde(default)]
    pub port: u16,
    /// Credential user name (mandatory).
    #[serde(default)]
    pub username: String,
    /// Credential password (mandatory; the SSH backend accepts but
    /// never transmits it).
    #[serde(default)]
    pub password: String,
    /// Share name, required for SMB only.
    #[serde(default)]
    pub smb_share: String,
    /// Directory the traversal is rooted at (mandatory).
    #[serde(default)]
    pub start_dir: String,
    /// Traversal depth; values ≤ 0 normalize to 3.
    #[serde(default)]
    pub depth: i32,
    /// Traversal mode; absent or empty normalizes to fast.
    #[serde(default, deserialize_with = "mode_or_empty")]
    pub mode: Option<Mode>,
}

impl ScoutRequest {
    /// Check mandatory fields and normalize depth and mode.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidRequest` naming the first missing
    /// field; no I/O has happened at that point.
    pub fn validate(&mut self) -> crate::Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::InvalidRequest("host is required".into()));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::InvalidRequest(
                "username and password are required".into(),
            ));
        }
        if self.start_dir.is_empty() {
            return Err(AppError::InvalidRequest(
                "start directory is required".into(),
            ));
        }
        if self.protocol == Protocol::Smb && self.smb_share.is_empty() {
            return Err(AppError::InvalidRequest(
                "SMB share name is required for smb protocol".into(),
            ));
        }
        if self.depth <= 0 {
            self.depth = 3;
        }
        Ok(())
    }

    /// Effective mode after normalization.
    #[must_use]
    pub fn effective_mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }
}

/// Outcome of one attempt. The artifact accumulates under the host's
/// subdirectory and is never mutated after write.
#[derive(Debug, Clone, Serialize)]
pub struct ScoutResult {
    /// Path of the persisted artifact.
    pub output_file: PathBuf,
    /// Protocol wire name.
    pub protocol: String,
    /// Normalized mode wire name.
    pub mode: String,
    /// Target host as requested.
    pub host: String,
    /// Command or persistence failure, when the attempt failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A scout failure, still carrying the populated result (when the
/// attempt got past validation) so callers can inspect what was
/// written.
#[derive(Debug)]
pub struct ScoutError {
    /// Error classification for status mapping.
    pub error: AppError,
    /// Populated result, absent only for validation failures.
    pub result: Option<ScoutResult>,
}

impl From<AppError> for ScoutError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            result: None,
        }
    }
}

/// Raw output of a backend command plus its failure, if any. Output is
/// normalized and persisted even when the command failed.
pub(crate) struct BackendCapture {
    pub normalized: String,
    pub command_error: Option<String>,
}

/// Replace path-hostile characters so a host becomes a directory name.
#[must_use]
pub fn sanitize_host(host: &str) -> String {
    host.trim().replace([':', '/'], "_")
}

/// Run one scout attempt: validate, prepare the artifact path,
/// dispatch to the protocol backend, normalize, persist, report.
///
/// # Errors
///
/// `InvalidRequest` before any side effect; `NotImplemented` for FTP;
/// `BackendFailed` when the external command failed (partial output is
/// still persisted); `PersistFailed` when the artifact could not be
/// written. All but the first carry the populated result.
pub async fn run_scout(
    loot_dir: &Path,
    mut req: ScoutRequest,
) -> std::result::Result<ScoutResult, ScoutError> {
    req.validate()?;

    let host_dir = loot_dir.join("fs").join(sanitize_host(&req.host));
    fs::create_dir_all(&host_dir)
        .await
        .map_err(|err| AppError::PersistFailed(format!("failed to create loot dir: {err}")))?;

    // Computed once per attempt; same-second retries against the same
    // host/protocol/mode reuse the path (accepted collision).
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let mode = req.effective_mode();
    let out_path = host_dir.join(format!(
        "{timestamp}_{}_{}.txt",
        req.protocol.as_str(),
        mode.as_str()
    ));

    let mut result = ScoutResult {
        output_file: out_path.clone(),
        protocol: req.protocol.as_str().to_owned(),
        mode: mode.as_str().to_owned(),
        host: req.host.clone(),
        error: None,
    };

    let capture = match req.protocol {
        Protocol::Ssh => ssh::enumerate(&req).await,
        Protocol::Smb => smb::enumerate(&req).await,
        Protocol::EvilWinrm => winrm::enumerate(&req).await,
        Protocol::Ftp => {
            let msg = "FTP auto-scout not implemented yet; use generate-only / manual mode";
            result.error = Some(msg.to_owned());
            return Err(ScoutError {
                error: AppError::NotImplemented(msg.into()),
                result: Some(result),
            });
        }
    };

    // Partial results are valuable: persist whatever was captured even
    // when the command failed.
    let write_error = fs::write(&out_path, capture.normalized.as_bytes())
        .await
        .err()
        .map(|err| format!("failed to write scout output: {err}"));

    if let Some(ref err) = write_error {
        warn!(host = req.host, %err, "scout artifact write failed");
    }

    match (capture.command_error, write_error) {
        (None, None) => {
            info!(
                host = req.host,
                protocol = result.protocol,
                output = %out_path.display(),
                "scout attempt complete"
            );
            Ok(result)
        }
        (Some(cmd_err), _) => {
            result.error = Some(cmd_err.clone());
            Err(ScoutError {
                error: AppError::BackendFailed(cmd_err),
                result: Some(result),
            })
        }
        (None, Some(write_err)) => {
            result.error = Some(write_err.clone());
            Err(ScoutError {
                error: AppError::PersistFailed(write_err),
                result: Some(result),
            })
        }
    }
}
