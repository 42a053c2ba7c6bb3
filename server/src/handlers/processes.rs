//! Process action handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct KillRequest {
    pub pid: u32,
}

#[derive(Debug, Serialize)]
pub struct KillResponse {
    pub status: String,
}

/// Terminate every process sharing the target's name. Protected system
/// processes are refused with 403.
pub async fn kill(
    State(state): State<AppState>,
    Json(req): Json<KillRequest>,
) -> AppResult<Json<KillResponse>> {
    let terminator = state.terminator.clone();
    let outcome = tokio::task::spawn_blocking(move || terminator.terminate_group(req.pid))
        .await
        .map_err(|e| AppError::InternalError(format!("kill task failed: {}", e)))??;

    Ok(Json(KillResponse {
        status: format!(
            "{} process(es) of {} terminated successfully",
            outcome.terminated, outcome.name
        ),
    }))
}
