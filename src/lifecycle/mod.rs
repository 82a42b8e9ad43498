//! Process/service lifecycle coordination.
//!
//! One supervisor per managed-service kind, each guarding its own
//! handle behind a dedicated mutex so that start/stop/status calls for
//! a kind serialize against each other while independent kinds never
//! contend. Handle presence is the single source of truth for
//! "running"; a process that exits on its own is not detected until an
//! explicit stop.

pub mod file_server;
pub mod proxy;

pub use file_server::FileServerSupervisor;
pub use proxy::ProxySupervisor;

/// Outcome of a stop request. Stopping an idle service is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// A running handle was terminated and released.
    Stopped,
    /// No handle existed; nothing to do.
    NotRunning,
}

impl StopOutcome {
    /// Wire representation used in API status payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::NotRunning => "not_running",
        }
    }
}
