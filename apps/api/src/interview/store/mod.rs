//! Interview persistence.
//!
//! The transcript is append-only and a session's completion is a single conditional
//! update, so a report can only be written once per session. Both rules are enforced
//! by every implementation, not just by the engine.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateProfile, NewCandidate};
use crate::models::interview::{Assessment, InterviewSession, Role, Turn};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgInterviewStore;

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn create_candidate(&self, candidate: NewCandidate) -> Result<CandidateProfile, AppError>;

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateProfile>, AppError>;

    /// Creates a new `in_progress` session for an existing candidate.
    async fn create_session(&self, candidate_id: Uuid) -> Result<InterviewSession, AppError>;

    async fn get_session(&self, id: Uuid) -> Result<Option<InterviewSession>, AppError>;

    /// Transcript of a session ordered by timestamp, ties broken by insertion order.
    async fn list_turns(&self, session_id: Uuid) -> Result<Vec<Turn>, AppError>;

    /// Appends a turn. Fails with `NotFound` for an unknown session and
    /// `InvalidState` once the session is completed.
    async fn append_turn(&self, session_id: Uuid, role: Role, content: &str)
        -> Result<Turn, AppError>;

    /// Writes scores, report and `completed` status in one update.
    /// Returns `false` without writing anything if the session was already completed.
    async fn complete_session(
        &self,
        session_id: Uuid,
        assessment: &Assessment,
    ) -> Result<bool, AppError>;
}

pub(crate) fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Interview {id} not found"))
}

pub(crate) fn session_completed(id: Uuid) -> AppError {
    AppError::InvalidState(format!("Interview {id} is already completed"))
}
