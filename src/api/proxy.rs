//! Pivot proxy endpoints: lifecycle, agent commands, installer.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::commands::{agent_command_linux, agent_command_windows, TargetOs};
use crate::installer::{self, InstallResult};
use crate::{AppError, Result};

/// `POST /api/start-proxy` — spawn the pivot proxy.
pub(super) async fn start_proxy(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let settings = state.store.load(&state.dirs).await?;
    state.proxy.start(&settings).await?;
    Ok(Json(json!({ "status": "started" })))
}

/// `POST /api/stop-proxy` — kill the pivot proxy; idempotent.
pub(super) async fn stop_proxy(State(state): State<Arc<AppState>>) -> Json<Value> {
    let outcome = state.proxy.stop().await;
    Json(json!({ "status": outcome.as_str() }))
}

/// `GET /api/status` — proxy running flag.
pub(super) async fn proxy_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "proxy_running": state.proxy.status().await }))
}

#[derive(Debug, Deserialize)]
pub(super) struct AgentQuery {
    os: TargetOs,
}

/// `GET /api/agent?os=` — agent launch command for a target OS.
pub(super) async fn agent_command(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<AgentQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(AgentQuery { os }) =
        query.map_err(|_| AppError::InvalidRequest("invalid os".into()))?;
    let settings = state.store.load(&state.dirs).await?;

    let command = match os {
        TargetOs::Linux => agent_command_linux(&settings),
        TargetOs::Windows => agent_command_windows(&settings),
    };
    Ok(Json(json!({ "command": command })))
}

/// `POST /api/skiddie` — install the pivot proxy binaries.
pub(super) async fn skiddie(State(state): State<Arc<AppState>>) -> Result<Json<InstallResult>> {
    let result = installer::run_install(&state.store, &state.dirs).await?;
    Ok(Json(result))
}
