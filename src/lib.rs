#![forbid(unsafe_code)]

//! `pivotd` — local control-plane daemon for pivoting helpers.
//!
//! Manages the lifecycle of a pivot proxy subprocess and an ad-hoc
//! payload file server, and runs remote filesystem scout sessions over
//! SSH/SMB/WinRM, all behind a JSON HTTP API bound to localhost.

pub mod api;
pub mod commands;
pub mod config;
pub mod errors;
pub mod files;
pub mod installer;
pub mod lifecycle;
pub mod paths;
pub mod scout;

pub use config::Settings;
pub use errors::{AppError, Result};
