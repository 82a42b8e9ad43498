//! Scout session endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{status_for, AppState};
use crate::scout::{run_scout, ScoutRequest};
use crate::AppError;

/// `POST /api/fs-scout` — run one enumeration attempt.
///
/// Validation failures return the error envelope at 400. Failures past
/// validation respond with the populated scout result (carrying its
/// `error` field) at the class-appropriate status, so the caller can
/// inspect what was written.
pub(super) async fn fs_scout(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScoutRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(err) => {
            return AppError::InvalidRequest(format!("invalid scout payload: {err}"))
                .into_response()
        }
    };

    match run_scout(&state.dirs.loot_dir(), request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(failure) => match failure.result {
            Some(result) => (status_for(&failure.error), Json(result)).into_response(),
            None => failure.error.into_response(),
        },
    }
}
