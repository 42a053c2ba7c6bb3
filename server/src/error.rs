//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use procwarden_engine::response::ActionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Refused actions
    Forbidden(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.as_str()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::ProcessNotFound { .. } => AppError::NotFound(err.to_string()),
            ActionError::ProtectedProcess { .. } | ActionError::AccessDenied { .. } => {
                AppError::Forbidden(err.to_string())
            }
            ActionError::CommandFailed { .. } => AppError::InternalError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_mapping() {
        let err: AppError = ActionError::ProtectedProcess {
            name: "lsass.exe".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err: AppError = ActionError::ProcessNotFound { pid: 9 }.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = ActionError::AccessDenied {
            reason: "kill refused".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
