use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::error::InterviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Interview(#[from] InterviewError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Interview(e) => {
                let (status, code) = match e {
                    InterviewError::InvalidStageIndex { .. } => {
                        (StatusCode::NOT_FOUND, "STAGE_NOT_FOUND")
                    }
                    InterviewError::InvalidTransition { .. } => {
                        (StatusCode::CONFLICT, "INVALID_TRANSITION")
                    }
                    InterviewError::StageLocked { .. } => (StatusCode::CONFLICT, "STAGE_LOCKED"),
                    InterviewError::StatusMismatch { .. } => {
                        (StatusCode::CONFLICT, "INVALID_PROCESS_STATUS")
                    }
                    InterviewError::NoStages | InterviewError::InvalidTime(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{ProcessStatus, StageStatus};

    #[test]
    fn test_interview_errors_map_to_http() {
        let (status, code, _) =
            AppError::from(InterviewError::InvalidStageIndex { index: 4, len: 2 }).parts();
        assert_eq!((status, code), (StatusCode::NOT_FOUND, "STAGE_NOT_FOUND"));

        let (status, code, message) = AppError::from(InterviewError::InvalidTransition {
            from: StageStatus::Passed,
            to: StageStatus::Pending,
        })
        .parts();
        assert_eq!((status, code), (StatusCode::CONFLICT, "INVALID_TRANSITION"));
        assert_eq!(message, "Cannot move stage from 'passed' to 'pending'");

        let (status, _, _) = AppError::from(InterviewError::NoStages).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, code, message) = AppError::from(InterviewError::StatusMismatch {
            requested: ProcessStatus::Hired,
            derived: ProcessStatus::InProgress,
        })
        .parts();
        assert_eq!((status, code), (StatusCode::CONFLICT, "INVALID_PROCESS_STATUS"));
        assert_eq!(
            message,
            "Process status 'hired' does not match its stages ('in_progress')"
        );
    }

    #[test]
    fn test_database_errors_are_not_leaked() {
        let (status, code, message) = AppError::from(sqlx::Error::RowNotFound).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "DATABASE_ERROR");
        assert!(!message.contains("RowNotFound"));
    }
}
