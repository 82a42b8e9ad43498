//! Settings endpoints: global config and the file-server subset.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::config::Settings;
use crate::{AppError, Result};

/// `GET /api/config` — current sanitized settings.
pub(super) async fn get_config(State(state): State<Arc<AppState>>) -> Result<Json<Settings>> {
    let settings = state.store.load(&state.dirs).await?;
    Ok(Json(settings))
}

/// `POST /api/config` — replace and persist the settings.
pub(super) async fn post_config(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Settings>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(settings) =
        payload.map_err(|err| AppError::InvalidRequest(format!("invalid config payload: {err}")))?;
    state.store.save(settings, &state.dirs).await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// File-server subset of the settings, accepted on its own.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileSettings {
    file_bind: String,
    file_port: u16,
    file_directory: String,
}

/// `GET /api/file-config` — file-server subset of the settings.
pub(super) async fn get_file_config(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let settings = state.store.load(&state.dirs).await?;
    Ok(Json(json!({
        "file_bind": settings.file_bind,
        "file_port": settings.file_port,
        "file_directory": settings.file_directory,
    })))
}

/// `POST /api/file-config` — merge the subset into the stored settings.
pub(super) async fn post_file_config(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<FileSettings>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(incoming) = payload
        .map_err(|err| AppError::InvalidRequest(format!("invalid file config payload: {err}")))?;

    let mut settings: Settings = state.store.load(&state.dirs).await?;
    settings.file_bind = incoming.file_bind;
    settings.file_port = incoming.file_port;
    settings.file_directory = incoming.file_directory;
    state.store.save(settings, &state.dirs).await?;

    Ok(Json(json!({ "status": "ok" })))
}
