//! Non-recursive listing of the payload file server directory.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tracing::warn;

use crate::{AppError, Result};

/// One entry of the served directory.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    /// Base name of the entry.
    pub name: String,
    /// Size in bytes (0 for directories on some platforms).
    pub size: u64,
    /// Last modification time.
    pub mod_time: DateTime<Utc>,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// List the directory non-recursively, sorted by name. Entries whose
/// metadata cannot be read are skipped.
///
/// # Errors
///
/// Returns `AppError::InvalidConfig` when the root is unset, missing,
/// or not a directory, and `AppError::Io` on read failures.
pub async fn list_directory(root: &str) -> Result<Vec<FileEntry>> {
    if root.is_empty() {
        return Err(AppError::InvalidConfig(
            "file server directory not configured".into(),
        ));
    }

    let root = Path::new(root);
    match fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(AppError::InvalidConfig(
                "file server directory path is not a directory".into(),
            ))
        }
        Err(err) => {
            return Err(AppError::InvalidConfig(format!(
                "file server directory not accessible: {err}"
            )))
        }
    }

    let mut entries = Vec::new();
    let mut dir = fs::read_dir(root).await?;
    while let Some(entry) = dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let meta = match entry.metadata().await {
            Ok(meta) => meta,
            Err(err) => {
                warn!(name, %err, "skipping unreadable directory entry");
                continue;
            }
        };
        let mod_time = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_default();
        entries.push(FileEntry {
            name,
            size: meta.len(),
            mod_time,
            is_dir: meta.is_dir(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
