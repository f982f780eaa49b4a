//! Interview Engine — processes one candidate utterance end to end.
//!
//! Flow: append user turn → classify phase → prompt + model reply (or fixed closing)
//!       → append assistant turn → if ending, synthesize assessment and complete
//!       → speech synthesis → return.
//!
//! Turns for a session are serialized by a per-session lock. Writes are never rolled
//! back: a turn that was appended stays, even if a later step fails.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::assessment::synthesize;
use crate::interview::collaborators::{SpeechSynthesizer, StructuredGenerator, TextGenerator};
use crate::interview::locks::SessionLocks;
use crate::interview::phase::{should_short_circuit, Phase, PhasePolicy};
use crate::interview::prompt_builder::build_interview_prompt;
use crate::interview::store::{session_completed, session_not_found, InterviewStore};
use crate::models::candidate::CvAnalysis;
use crate::models::interview::{InterviewSession, Role, Turn};

/// Result of one processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub message: Turn,
    /// Absent when speech synthesis failed.
    pub audio: Option<Bytes>,
    pub is_complete: bool,
    pub phase: Phase,
}

pub struct InterviewEngine {
    store: Arc<dyn InterviewStore>,
    text: Arc<dyn TextGenerator>,
    structured: Arc<dyn StructuredGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    policy: PhasePolicy,
    locks: SessionLocks,
}

impl InterviewEngine {
    pub fn new(
        store: Arc<dyn InterviewStore>,
        text: Arc<dyn TextGenerator>,
        structured: Arc<dyn StructuredGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        policy: PhasePolicy,
    ) -> Self {
        Self {
            store,
            text,
            structured,
            speech,
            policy,
            locks: SessionLocks::new(),
        }
    }

    pub async fn process_turn(
        &self,
        session_id: Uuid,
        user_text: &str,
    ) -> Result<TurnOutcome, AppError> {
        // Unknown and finished sessions never get a lock entry.
        self.open_session(session_id).await?;

        let guard = self.locks.acquire(session_id).await;
        let session = match self.open_session(session_id).await {
            Ok(session) => session,
            Err(e) => {
                drop(guard);
                self.locks.release(session_id).await;
                return Err(e);
            }
        };
        let candidate = self
            .store
            .get_candidate(session.candidate_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Candidate {} not found", session.candidate_id))
            })?;

        self.store
            .append_turn(session_id, Role::User, user_text)
            .await?;
        let mut transcript = self.store.list_turns(session_id).await?;

        let decision = self.policy.classify(&transcript);
        info!(
            "Interview {session_id}: {} turns, phase={}, should_end={}",
            transcript.len(),
            decision.phase.as_str(),
            decision.should_end
        );

        let reply = if should_short_circuit(&decision, &transcript) {
            self.policy.closing_message.clone()
        } else {
            let prompt =
                build_interview_prompt(decision.phase, &transcript, &candidate.cv_analysis)?;
            self.text.generate(&prompt.system, &transcript).await?
        };

        let message = self
            .store
            .append_turn(session_id, Role::Assistant, &reply)
            .await?;

        let mut is_complete = false;
        if decision.should_end {
            transcript.push(message.clone());
            is_complete = self
                .complete(session_id, &transcript, &candidate.cv_analysis)
                .await?;
        }

        drop(guard);
        if is_complete {
            self.locks.release(session_id).await;
        }

        let audio = match self.speech.synthesize(&reply).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Interview {session_id}: replying without audio: {e}");
                None
            }
        };

        Ok(TurnOutcome {
            message,
            audio,
            is_complete,
            phase: decision.phase,
        })
    }

    async fn open_session(&self, session_id: Uuid) -> Result<InterviewSession, AppError> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        if session.is_completed() {
            return Err(session_completed(session_id));
        }
        Ok(session)
    }

    /// Synthesizes the report and performs the completion transition.
    /// Assessment failures leave the session `in_progress` so a later turn can retry.
    async fn complete(
        &self,
        session_id: Uuid,
        transcript: &[Turn],
        profile: &CvAnalysis,
    ) -> Result<bool, AppError> {
        let assessment = match synthesize(self.structured.as_ref(), transcript, profile).await {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!("Interview {session_id} stays in progress, assessment failed: {e}");
                return Ok(false);
            }
        };

        if self.store.complete_session(session_id, &assessment).await? {
            info!(
                "Interview {session_id} completed: technical={} soft_skills={}",
                assessment.technical_score, assessment.soft_skill_score
            );
        } else {
            info!("Interview {session_id} was already completed, report discarded");
        }
        Ok(true)
    }
}
