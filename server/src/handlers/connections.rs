//! Connection listing handler

use axum::Json;

use procwarden_engine::connections::{self, ConnectionEntry};

use crate::{AppError, AppResult};

/// List established inet connections with their owning pids.
pub async fn list() -> AppResult<Json<Vec<ConnectionEntry>>> {
    let entries = tokio::task::spawn_blocking(connections::established)
        .await
        .map_err(|e| AppError::InternalError(format!("connection listing failed: {}", e)))?;

    Ok(Json(entries))
}
