//! Scan handlers

use axum::{extract::State, Json};

use procwarden_engine::report;
use procwarden_engine::store::ScoreEntry;
use procwarden_engine::types::ProcessSnapshot;

use crate::{AppError, AppResult, AppState};

/// Run a scan and return the ranked snapshots, most suspicious first.
pub async fn run(State(state): State<AppState>) -> AppResult<Json<Vec<ProcessSnapshot>>> {
    let engine = state.engine.clone();
    // The scan blocks for the CPU sampling window
    let results = tokio::task::spawn_blocking(move || engine.run_scan())
        .await
        .map_err(|e| AppError::InternalError(format!("scan task failed: {}", e)))?;

    if let Some(avg) = report::average_score(&results) {
        state.history.lock().record(avg);
    }

    Ok(Json(results))
}

/// Return the last persisted result set without rescanning.
pub async fn last_results(State(state): State<AppState>) -> AppResult<Json<Vec<ProcessSnapshot>>> {
    let store = state.results.clone();
    let results = tokio::task::spawn_blocking(move || store.load().map_err(|e| e.to_string()))
        .await
        .map_err(|e| AppError::InternalError(format!("load task failed: {}", e)))?
        .map_err(AppError::InternalError)?;

    Ok(Json(results))
}

/// Rolling average-score history, oldest first.
pub async fn history(State(state): State<AppState>) -> Json<Vec<ScoreEntry>> {
    Json(state.history.lock().entries())
}
