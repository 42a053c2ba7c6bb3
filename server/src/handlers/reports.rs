//! Report export handler

use axum::{extract::State, Json};

use procwarden_engine::report::AssessmentReport;

use crate::{AppError, AppResult, AppState};

/// Run a fresh scan and roll it up into an assessment report.
pub async fn assessment(State(state): State<AppState>) -> AppResult<Json<AssessmentReport>> {
    let engine = state.engine.clone();
    let results = tokio::task::spawn_blocking(move || engine.run_scan())
        .await
        .map_err(|e| AppError::InternalError(format!("scan task failed: {}", e)))?;

    Ok(Json(AssessmentReport::build(&results)))
}
