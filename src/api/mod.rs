//! HTTP control API.
//!
//! All endpoints live under `/api`, speak JSON, and share one
//! [`AppState`]. Request bodies are capped at 64 KiB and parsed
//! strictly (unknown fields rejected). Wrong methods return the 405
//! JSON envelope; every failure carries `{"error": <message>}` with a
//! status reflecting its class.

mod config;
mod files;
mod proxy;
mod scout;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::config::ConfigStore;
use crate::lifecycle::{FileServerSupervisor, ProxySupervisor};
use crate::paths::AppDirs;
use crate::AppError;

/// Maximum accepted request body size.
pub const MAX_REQUEST_BODY: usize = 64 * 1024;

/// Shared state handed to every handler.
pub struct AppState {
    /// Settings load/save gateway.
    pub store: ConfigStore,
    /// Resolved per-user directories.
    pub dirs: AppDirs,
    /// Pivot proxy lifecycle coordinator.
    pub proxy: ProxySupervisor,
    /// Payload file server lifecycle coordinator.
    pub file_server: FileServerSupervisor,
}

impl AppState {
    /// Build state with idle supervisors.
    #[must_use]
    pub fn new(store: ConfigStore, dirs: AppDirs) -> Self {
        Self {
            store,
            dirs,
            proxy: ProxySupervisor::new(),
            file_server: FileServerSupervisor::new(),
        }
    }
}

/// HTTP status for an error class.
#[must_use]
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidRequest(_) | AppError::InvalidConfig(_) | AppError::NotImplemented(_) => {
            StatusCode::BAD_REQUEST
        }
        AppError::AlreadyRunning(_) => StatusCode::CONFLICT,
        AppError::Config(_)
        | AppError::StartFailed(_)
        | AppError::BackendFailed(_)
        | AppError::PersistFailed(_)
        | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "method not allowed" })),
    )
        .into_response()
}

/// Build the control API router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/config",
            get(config::get_config)
                .post(config::post_config)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/start-proxy",
            post(proxy::start_proxy).fallback(method_not_allowed),
        )
        .route(
            "/api/stop-proxy",
            post(proxy::stop_proxy).fallback(method_not_allowed),
        )
        .route(
            "/api/status",
            get(proxy::proxy_status).fallback(method_not_allowed),
        )
        .route(
            "/api/agent",
            get(proxy::agent_command).fallback(method_not_allowed),
        )
        .route(
            "/api/skiddie",
            post(proxy::skiddie).fallback(method_not_allowed),
        )
        .route(
            "/api/file-config",
            get(config::get_file_config)
                .post(config::post_file_config)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/file-start",
            post(files::file_start).fallback(method_not_allowed),
        )
        .route(
            "/api/file-stop",
            post(files::file_stop).fallback(method_not_allowed),
        )
        .route(
            "/api/file-status",
            get(files::file_status).fallback(method_not_allowed),
        )
        .route(
            "/api/file-command",
            get(files::file_command).fallback(method_not_allowed),
        )
        .route(
            "/api/file-list",
            get(files::file_list).fallback(method_not_allowed),
        )
        .route(
            "/api/fs-scout",
            post(scout::fs_scout).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .with_state(state)
}
