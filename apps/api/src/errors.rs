use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Attempted mutation of an interview that is already completed.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("CV extraction failed: {0}")]
    Extraction(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    /// The model's assessment could not be parsed into the expected report shape.
    #[error("Malformed assessment: {0}")]
    MalformedAssessment(String),

    #[error("Speech synthesis failed: {0}")]
    SpeechSynthesis(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
            AppError::Extraction(msg) => {
                tracing::error!("CV extraction error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTRACTION_ERROR",
                    "The CV could not be analyzed".to_string(),
                )
            }
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "The interviewer could not produce a reply, please try again".to_string(),
                )
            }
            AppError::MalformedAssessment(msg) => {
                tracing::error!("Malformed assessment: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_ASSESSMENT",
                    "The interview assessment could not be produced".to_string(),
                )
            }
            AppError::SpeechSynthesis(msg) => {
                tracing::error!("Speech synthesis error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SPEECH_SYNTHESIS_ERROR",
                    "Audio could not be generated".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
