//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or persistence failure.
    Config(String),
    /// Caller supplied a malformed or incomplete request.
    InvalidRequest(String),
    /// A managed service is already running.
    AlreadyRunning(String),
    /// A configuration precondition for starting a service is not met.
    InvalidConfig(String),
    /// A managed service failed to spawn or bind.
    StartFailed(String),
    /// A scout backend command failed.
    BackendFailed(String),
    /// A scout artifact could not be written.
    PersistFailed(String),
    /// The requested feature is declared but not automated.
    NotImplemented(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
            Self::InvalidRequest(msg)
            | Self::AlreadyRunning(msg)
            | Self::InvalidConfig(msg)
            | Self::StartFailed(msg)
            | Self::BackendFailed(msg)
            | Self::PersistFailed(msg)
            | Self::NotImplemented(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}
