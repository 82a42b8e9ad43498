//! Payload file server endpoints: lifecycle, listing, download commands.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::commands::{download_command, TargetOs};
use crate::files::{list_directory, FileEntry};
use crate::{AppError, Result};

/// `POST /api/file-start` — start serving the configured directory.
pub(super) async fn file_start(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let settings = state.store.load(&state.dirs).await?;
    state.file_server.start(&settings).await?;
    Ok(Json(json!({ "status": "started" })))
}

/// `POST /api/file-stop` — stop the file server; idempotent.
pub(super) async fn file_stop(State(state): State<Arc<AppState>>) -> Json<Value> {
    let outcome = state.file_server.stop().await;
    Json(json!({ "status": outcome.as_str() }))
}

/// `GET /api/file-status` — file server running flag.
pub(super) async fn file_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "file_server_running": state.file_server.status().await }))
}

#[derive(Debug, Deserialize)]
pub(super) struct FileCommandQuery {
    os: TargetOs,
    #[serde(default)]
    filename: String,
}

/// `GET /api/file-command?os=&filename=` — per-file download one-liner.
pub(super) async fn file_command(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<FileCommandQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(FileCommandQuery { os, filename }) =
        query.map_err(|_| AppError::InvalidRequest("invalid os".into()))?;
    let settings = state.store.load(&state.dirs).await?;

    let command = download_command(&settings, os, &filename)?;
    Ok(Json(json!({ "command": command })))
}

/// `GET /api/file-list` — non-recursive listing of the served directory.
pub(super) async fn file_list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<FileEntry>>> {
    let settings = state.store.load(&state.dirs).await?;
    let entries = list_directory(&settings.file_directory).await?;
    Ok(Json(entries))
}
