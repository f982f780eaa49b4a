//! In-memory store used by tests: sessions plus an arena of turns indexed by session id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::store::{session_completed, session_not_found, InterviewStore};
use crate::models::candidate::{CandidateProfile, NewCandidate};
use crate::models::interview::{Assessment, InterviewSession, Role, SessionStatus, Turn};

#[derive(Default)]
struct MemoryState {
    candidates: HashMap<Uuid, CandidateProfile>,
    sessions: HashMap<Uuid, InterviewSession>,
    turns: HashMap<Uuid, Vec<Turn>>,
}

#[derive(Default)]
pub struct MemoryInterviewStore {
    state: Mutex<MemoryState>,
    completions: AtomicUsize,
}

impl MemoryInterviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful completion transitions (reports written).
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub fn candidate_count(&self) -> usize {
        self.state.lock().unwrap().candidates.len()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }
}

#[async_trait]
impl InterviewStore for MemoryInterviewStore {
    async fn create_candidate(&self, candidate: NewCandidate) -> Result<CandidateProfile, AppError> {
        let profile = CandidateProfile {
            id: Uuid::new_v4(),
            name: candidate.name,
            email: candidate.email,
            cv_key: candidate.cv_key,
            cv_analysis: candidate.cv_analysis,
            created_at: Utc::now(),
        };
        let mut state = self.state.lock().unwrap();
        state.candidates.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateProfile>, AppError> {
        Ok(self.state.lock().unwrap().candidates.get(&id).cloned())
    }

    async fn create_session(&self, candidate_id: Uuid) -> Result<InterviewSession, AppError> {
        let mut state = self.state.lock().unwrap();
        if !state.candidates.contains_key(&candidate_id) {
            return Err(AppError::NotFound(format!(
                "Candidate {candidate_id} not found"
            )));
        }
        let now = Utc::now();
        let session = InterviewSession {
            id: Uuid::new_v4(),
            candidate_id,
            status: SessionStatus::InProgress,
            technical_score: None,
            soft_skill_score: None,
            report: None,
            created_at: now,
            updated_at: now,
        };
        state.sessions.insert(session.id, session.clone());
        state.turns.insert(session.id, Vec::new());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<InterviewSession>, AppError> {
        Ok(self.state.lock().unwrap().sessions.get(&id).cloned())
    }

    async fn list_turns(&self, session_id: Uuid) -> Result<Vec<Turn>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.turns.get(&session_id).cloned().unwrap_or_default())
    }

    async fn append_turn(
        &self,
        session_id: Uuid,
        role: Role,
        content: &str,
    ) -> Result<Turn, AppError> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        if session.is_completed() {
            return Err(session_completed(session_id));
        }
        session.updated_at = now;

        let turn = Turn {
            id: Uuid::new_v4(),
            session_id,
            role,
            content: content.to_string(),
            timestamp: now,
        };
        state
            .turns
            .entry(session_id)
            .or_default()
            .push(turn.clone());
        Ok(turn)
    }

    async fn complete_session(
        &self,
        session_id: Uuid,
        assessment: &Assessment,
    ) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        if session.is_completed() {
            return Ok(false);
        }
        session.status = SessionStatus::Completed;
        session.technical_score = Some(assessment.technical_score);
        session.soft_skill_score = Some(assessment.soft_skill_score);
        session.report = Some(assessment.clone());
        session.updated_at = Utc::now();
        self.completions.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CvAnalysis;

    async fn seeded() -> (MemoryInterviewStore, InterviewSession) {
        let store = MemoryInterviewStore::new();
        let candidate = store
            .create_candidate(NewCandidate {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                cv_key: "cvs/1-ada.pdf".to_string(),
                cv_analysis: CvAnalysis::default(),
            })
            .await
            .unwrap();
        let session = store.create_session(candidate.id).await.unwrap();
        (store, session)
    }

    fn assessment() -> Assessment {
        Assessment {
            technical: vec![],
            soft_skills: vec![],
            overall: "n/a".to_string(),
            technical_score: 0,
            soft_skill_score: 0,
        }
    }

    #[tokio::test]
    async fn test_turns_are_kept_in_append_order() {
        let (store, session) = seeded().await;
        store.append_turn(session.id, Role::User, "one").await.unwrap();
        store
            .append_turn(session.id, Role::Assistant, "two")
            .await
            .unwrap();
        let turns = store.list_turns(session.id).await.unwrap();
        let contents: Vec<_> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_append_after_completion_is_rejected() {
        let (store, session) = seeded().await;
        assert!(store.complete_session(session.id, &assessment()).await.unwrap());
        let err = store
            .append_turn(session.id, Role::User, "hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert!(store.list_turns(session.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_completion_is_a_no_op() {
        let (store, session) = seeded().await;
        assert!(store.complete_session(session.id, &assessment()).await.unwrap());
        assert!(!store.complete_session(session.id, &assessment()).await.unwrap());
        assert_eq!(store.completions(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = MemoryInterviewStore::new();
        let err = store
            .append_turn(Uuid::new_v4(), Role::User, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
