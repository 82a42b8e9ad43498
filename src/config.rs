//! Daemon settings: defaults, sanitization, and JSON persistence.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::paths::AppDirs;
use crate::Result;

const DEFAULT_PROXY_BIND: &str = "127.0.0.1";
const DEFAULT_PROXY_PORT: u16 = 11601;
const DEFAULT_PUBLIC_IP: &str = "CHANGEME_PUBLIC_IP";
const DEFAULT_PROXY_BINARY: &str = "/opt/ligolo/proxy";
const DEFAULT_AGENT_BINARY: &str = "agent";
const DEFAULT_FILE_BIND: &str = "0.0.0.0";
const DEFAULT_FILE_PORT: u16 = 8000;

/// Durable key/value settings for the daemon and its managed services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Address the pivot proxy listens on.
    pub proxy_bind: String,
    /// Port the pivot proxy listens on.
    pub proxy_port: u16,
    /// Address remote agents and download commands reach this host at.
    pub public_ip: String,
    /// Path of the pivot proxy binary.
    pub proxy_binary: String,
    /// Name of the agent binary referenced in generated commands.
    pub agent_binary: String,

    /// Address the payload file server binds to.
    pub file_bind: String,
    /// Port the payload file server binds to.
    pub file_port: u16,
    /// Directory served by the payload file server.
    pub file_directory: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proxy_bind: DEFAULT_PROXY_BIND.into(),
            proxy_port: DEFAULT_PROXY_PORT,
            public_ip: DEFAULT_PUBLIC_IP.into(),
            proxy_binary: DEFAULT_PROXY_BINARY.into(),
            agent_binary: DEFAULT_AGENT_BINARY.into(),
            file_bind: DEFAULT_FILE_BIND.into(),
            file_port: DEFAULT_FILE_PORT,
            file_directory: String::new(),
        }
    }
}

impl Settings {
    /// Trim values and replace empty or out-of-range fields with
    /// defaults. An empty `file_directory` falls back to the loot dir.
    pub fn sanitize(&mut self, dirs: &AppDirs) {
        self.proxy_bind = self.proxy_bind.trim().to_owned();
        self.public_ip = self.public_ip.trim().to_owned();
        self.proxy_binary = self.proxy_binary.trim().to_owned();
        self.agent_binary = self.agent_binary.trim().to_owned();
        self.file_bind = self.file_bind.trim().to_owned();
        self.file_directory = self.file_directory.trim().to_owned();

        if self.proxy_port == 0 {
            self.proxy_port = DEFAULT_PROXY_PORT;
        }
        if self.proxy_bind.is_empty() {
            self.proxy_bind = DEFAULT_PROXY_BIND.into();
        }
        if self.proxy_binary.is_empty() {
            self.proxy_binary = DEFAULT_PROXY_BINARY.into();
        }
        if self.agent_binary.is_empty() {
            self.agent_binary = DEFAULT_AGENT_BINARY.into();
        }
        if self.file_port == 0 {
            self.file_port = DEFAULT_FILE_PORT;
        }
        if self.file_bind.is_empty() {
            self.file_bind = DEFAULT_FILE_BIND.into();
        }
        if self.file_directory.is_empty() {
            self.file_directory = dirs.loot_dir().to_string_lossy().into_owned();
        }
    }
}

/// Load/save gateway for the persisted settings file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by the given settings file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the persisted settings file.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the settings file, returning sanitized defaults when the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` on read failures other than absence, or
    /// `AppError::Config` when the file contains invalid JSON.
    pub async fn load(&self, dirs: &AppDirs) -> Result<Settings> {
        let mut settings = match fs::read(&self.path).await {
            Ok(raw) => serde_json::from_slice::<Settings>(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(err) => return Err(err.into()),
        };
        settings.sanitize(dirs);
        Ok(settings)
    }

    /// Sanitize and persist the settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` when the file or its parent directory
    /// cannot be written.
    pub async fn save(&self, mut settings: Settings, dirs: &AppDirs) -> Result<Settings> {
        settings.sanitize(dirs);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(&settings)?;
        fs::write(&self.path, raw).await?;
        Ok(settings)
    }
}
