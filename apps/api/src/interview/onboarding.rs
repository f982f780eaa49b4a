//! Candidate onboarding and interview detail lookups.

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::cv::extraction::CvExtractor;
use crate::cv::storage::{content_type_for, cv_object_key, CvStorage};
use crate::errors::AppError;
use crate::interview::store::{session_not_found, InterviewStore};
use crate::models::candidate::{CandidateProfile, NewCandidate};
use crate::models::interview::{InterviewSession, Turn};

pub struct CvUpload {
    pub name: String,
    pub email: String,
    pub file_name: String,
    pub document: Bytes,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub candidate_id: Uuid,
    pub interview_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub signed_cv_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewDetail {
    #[serde(flatten)]
    pub session: InterviewSession,
    pub candidate: CandidateDetail,
    pub turns: Vec<Turn>,
}

/// Stores the CV, extracts the profile, then creates the candidate and a fresh
/// `in_progress` interview. Stops at the first failing step.
pub async fn register_candidate(
    store: &dyn InterviewStore,
    storage: &dyn CvStorage,
    extractor: &dyn CvExtractor,
    upload: CvUpload,
) -> Result<Registration, AppError> {
    let key = cv_object_key(&upload.file_name, Utc::now());
    storage
        .put_cv(&key, upload.document.clone(), content_type_for(&upload.file_name))
        .await?;

    let cv_analysis = extractor.extract(&upload.document).await?;
    info!(
        "Extracted CV profile for {}: {} skills, {} roles",
        upload.email,
        cv_analysis.skills.len(),
        cv_analysis.experience.len()
    );

    let candidate = store
        .create_candidate(NewCandidate {
            name: upload.name,
            email: upload.email,
            cv_key: key,
            cv_analysis,
        })
        .await?;
    let session = store.create_session(candidate.id).await?;

    info!("Registered candidate {} with interview {}", candidate.id, session.id);
    Ok(Registration {
        candidate_id: candidate.id,
        interview_id: session.id,
    })
}

pub async fn get_interview(
    store: &dyn InterviewStore,
    storage: &dyn CvStorage,
    url_ttl: Duration,
    session_id: Uuid,
) -> Result<InterviewDetail, AppError> {
    let session = store
        .get_session(session_id)
        .await?
        .ok_or_else(|| session_not_found(session_id))?;
    let profile = store
        .get_candidate(session.candidate_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidate {} not found", session.candidate_id))
        })?;
    let signed_cv_url = storage.signed_url(&profile.cv_key, url_ttl).await?;
    let turns = store.list_turns(session_id).await?;

    Ok(InterviewDetail {
        session,
        candidate: CandidateDetail {
            profile,
            signed_cv_url,
        },
        turns,
    })
}
