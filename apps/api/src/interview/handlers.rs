use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::onboarding::{
    get_interview, register_candidate, CvUpload, InterviewDetail, Registration,
};
use crate::interview::phase::Phase;
use crate::models::interview::Turn;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: Turn,
    /// Base64-encoded MP3 of the reply, `null` when speech synthesis failed.
    pub audio_base64: Option<String>,
    pub is_complete: bool,
    pub phase: Phase,
}

/// POST /api/v1/candidates
/// Multipart form with `name`, `email` and the `cv` file.
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Registration>, AppError> {
    let mut name = None;
    let mut email = None;
    let mut cv: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(read_text(field).await?),
            "email" => email = Some(read_text(field).await?),
            "cv" => {
                let file_name = field.file_name().unwrap_or("cv.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid CV upload: {e}")))?;
                cv = Some((file_name, data));
            }
            _ => {}
        }
    }

    let name = required(name, "name")?;
    let email = required(email, "email")?;
    let (file_name, document) = cv
        .filter(|(_, data)| !data.is_empty())
        .ok_or_else(|| AppError::Validation("A CV file is required".to_string()))?;

    let registration = register_candidate(
        state.store.as_ref(),
        state.cv_storage.as_ref(),
        state.cv_extractor.as_ref(),
        CvUpload {
            name,
            email,
            file_name,
            document,
        },
    )
    .await?;
    Ok(Json(registration))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewDetail>, AppError> {
    let detail = get_interview(
        state.store.as_ref(),
        state.cv_storage.as_ref(),
        state.cv_url_ttl,
        id,
    )
    .await?;
    Ok(Json(detail))
}

/// POST /api/v1/interviews/:id/message
pub async fn handle_post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let outcome = state.engine.process_turn(id, &req.message).await?;
    Ok(Json(MessageResponse {
        message: outcome.message,
        audio_base64: outcome.audio.map(|audio| STANDARD.encode(audio)),
        is_complete: outcome.is_complete,
        phase: outcome.phase,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}
