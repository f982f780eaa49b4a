//! Phase classification — derives the interview phase from the transcript.
//!
//! The phase is never stored. It is recomputed from the transcript length and
//! the latest turn on every call, so there is no cached state to go stale.

use serde::{Deserialize, Serialize};

use crate::models::interview::{Role, Turn};

/// Phrases that end the interview when they appear anywhere in the latest turn.
pub const DEFAULT_CLOSING_PHRASES: &[&str] = &[
    "thanks",
    "thank you",
    "bye",
    "goodbye",
    "good bye",
    "see you",
    "take care",
    "have a great day",
];

/// Sent instead of a model reply when the candidate closes the interview themselves.
pub const DEFAULT_CLOSING_MESSAGE: &str = "Thank you for taking the time to speak with me today. \
    This concludes our interview. We will review your responses and be in touch soon. \
    Have a great day!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Technical,
    SoftSkills,
    Conclusion,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Technical => "technical",
            Phase::SoftSkills => "soft_skills",
            Phase::Conclusion => "conclusion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseDecision {
    pub phase: Phase,
    pub should_end: bool,
}

/// Tunable interview policy: phase thresholds and closing vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasePolicy {
    /// Transcript length at which the soft-skills phase starts.
    pub soft_skills_from: usize,
    /// Transcript length at which the interview ends regardless of content.
    pub max_turns: usize,
    /// Lowercase phrases matched as substrings of the latest turn.
    pub closing_phrases: Vec<String>,
    pub closing_message: String,
}

impl Default for PhasePolicy {
    fn default() -> Self {
        Self {
            soft_skills_from: 8,
            max_turns: 12,
            closing_phrases: DEFAULT_CLOSING_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            closing_message: DEFAULT_CLOSING_MESSAGE.to_string(),
        }
    }
}

impl PhasePolicy {
    /// Classifies the transcript. Pure and deterministic.
    pub fn classify(&self, turns: &[Turn]) -> PhaseDecision {
        let should_end = turns.len() >= self.max_turns
            || turns
                .last()
                .is_some_and(|t| self.contains_closing_phrase(&t.content));

        let phase = if should_end {
            Phase::Conclusion
        } else if turns.len() >= self.soft_skills_from {
            Phase::SoftSkills
        } else {
            Phase::Technical
        };

        PhaseDecision { phase, should_end }
    }

    pub fn contains_closing_phrase(&self, content: &str) -> bool {
        let content = content.to_lowercase();
        self.closing_phrases
            .iter()
            .any(|phrase| content.contains(phrase.as_str()))
    }
}

/// True when termination was triggered by the candidate's own turn, in which case
/// the model is not asked for a reply.
pub fn should_short_circuit(decision: &PhaseDecision, turns: &[Turn]) -> bool {
    decision.should_end && turns.last().is_some_and(|t| t.role == Role::User)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn turn(role: Role, content: &str) -> Turn {
        Turn {
            id: Uuid::new_v4(),
            session_id: Uuid::nil(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Alternating user/assistant transcript with neutral content.
    fn transcript(len: usize) -> Vec<Turn> {
        (0..len)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                turn(role, "I mostly worked on backend services in Python.")
            })
            .collect()
    }

    #[test]
    fn test_empty_transcript_is_technical() {
        let decision = PhasePolicy::default().classify(&[]);
        assert_eq!(decision.phase, Phase::Technical);
        assert!(!decision.should_end);
    }

    #[test]
    fn test_short_transcripts_are_technical() {
        let policy = PhasePolicy::default();
        for len in 0..8 {
            let decision = policy.classify(&transcript(len));
            assert_eq!(decision.phase, Phase::Technical, "len={len}");
            assert!(!decision.should_end, "len={len}");
        }
    }

    #[test]
    fn test_mid_transcripts_are_soft_skills() {
        let policy = PhasePolicy::default();
        for len in 8..12 {
            let decision = policy.classify(&transcript(len));
            assert_eq!(decision.phase, Phase::SoftSkills, "len={len}");
            assert!(!decision.should_end, "len={len}");
        }
    }

    #[test]
    fn test_long_transcripts_conclude() {
        let policy = PhasePolicy::default();
        for len in [12, 13, 20] {
            let decision = policy.classify(&transcript(len));
            assert_eq!(decision.phase, Phase::Conclusion, "len={len}");
            assert!(decision.should_end, "len={len}");
        }
    }

    #[test]
    fn test_closing_phrase_is_case_insensitive() {
        let mut turns = transcript(2);
        turns.push(turn(Role::User, "Thank You, BYE"));
        let decision = PhasePolicy::default().classify(&turns);
        assert_eq!(decision.phase, Phase::Conclusion);
        assert!(decision.should_end);
    }

    #[test]
    fn test_closing_phrase_only_checked_on_latest_turn() {
        let mut turns = vec![turn(Role::User, "thanks for having me")];
        turns.push(turn(Role::Assistant, "Let's start with Rust ownership."));
        let decision = PhasePolicy::default().classify(&turns);
        assert_eq!(decision.phase, Phase::Technical);
        assert!(!decision.should_end);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let policy = PhasePolicy::default();
        let turns = transcript(9);
        assert_eq!(policy.classify(&turns), policy.classify(&turns));
    }

    #[test]
    fn test_first_technical_answer_does_not_end() {
        let turns = vec![turn(Role::User, "I have 5 years of Python experience")];
        let decision = PhasePolicy::default().classify(&turns);
        assert_eq!(decision.phase, Phase::Technical);
        assert!(!should_short_circuit(&decision, &turns));
    }

    #[test]
    fn test_short_circuit_requires_user_turn_last() {
        let policy = PhasePolicy::default();
        let mut turns = transcript(2);
        turns.push(turn(Role::Assistant, "Goodbye and take care"));
        let decision = policy.classify(&turns);
        assert!(decision.should_end);
        assert!(!should_short_circuit(&decision, &turns));

        turns.push(turn(Role::User, "bye"));
        let decision = policy.classify(&turns);
        assert!(should_short_circuit(&decision, &turns));
    }

    #[test]
    fn test_custom_thresholds_are_honored() {
        let policy = PhasePolicy {
            soft_skills_from: 2,
            max_turns: 4,
            ..PhasePolicy::default()
        };
        assert_eq!(policy.classify(&transcript(1)).phase, Phase::Technical);
        assert_eq!(policy.classify(&transcript(2)).phase, Phase::SoftSkills);
        assert!(policy.classify(&transcript(4)).should_end);
    }
}
