//! Prompt Builder — phase-scoped system instructions for the interviewer model.
//!
//! Output is a pure function of (phase, transcript, profile): the same inputs always
//! produce byte-identical instructions, so tests can assert on them without a model.

use serde::Serialize;

use crate::errors::AppError;
use crate::interview::phase::Phase;
use crate::interview::prompts::{
    CONCLUSION_PHASE_INSTRUCTIONS, INTERVIEW_SYSTEM_TEMPLATE, SOFT_SKILLS_PHASE_INSTRUCTIONS,
    TECHNICAL_PHASE_INSTRUCTIONS,
};
use crate::llm_client::prompts::{fill_template, INTERVIEWER_PERSONA};
use crate::models::candidate::CvAnalysis;
use crate::models::interview::Turn;

/// Structured context embedded into every interviewer prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptContext<'a> {
    pub phase: Phase,
    pub message_count: usize,
    pub cv_profile: &'a CvAnalysis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewPrompt<'a> {
    pub system: String,
    pub context: PromptContext<'a>,
}

pub fn build_interview_prompt<'a>(
    phase: Phase,
    transcript: &[Turn],
    profile: &'a CvAnalysis,
) -> Result<InterviewPrompt<'a>, AppError> {
    let context = PromptContext {
        phase,
        message_count: transcript.len(),
        cv_profile: profile,
    };

    let context_json = serde_json::to_string_pretty(&context).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize prompt context: {e}"))
    })?;

    let system = fill_template(
        INTERVIEW_SYSTEM_TEMPLATE,
        &[
            ("persona", INTERVIEWER_PERSONA),
            ("phase_instructions", &phase_instructions(phase, profile)),
            ("context_json", &context_json),
        ],
    );

    Ok(InterviewPrompt { system, context })
}

fn phase_instructions(phase: Phase, profile: &CvAnalysis) -> String {
    match phase {
        Phase::Technical => {
            TECHNICAL_PHASE_INSTRUCTIONS.replace("{skills}", &summarize_skills(profile))
        }
        Phase::SoftSkills => {
            SOFT_SKILLS_PHASE_INSTRUCTIONS.replace("{experience}", &summarize_experience(profile))
        }
        Phase::Conclusion => CONCLUSION_PHASE_INSTRUCTIONS.to_string(),
    }
}

fn summarize_skills(profile: &CvAnalysis) -> String {
    if profile.skills.is_empty() {
        return "none listed, so ask about the technologies they used most recently".to_string();
    }
    profile.skills.join(", ")
}

fn summarize_experience(profile: &CvAnalysis) -> String {
    if profile.experience.is_empty() {
        return "none listed, so ask about projects, studies or teamwork in general".to_string();
    }
    profile
        .experience
        .iter()
        .map(|e| format!("{} at {} ({})", e.role, e.company, e.duration))
        .collect::<Vec<_>>()
        .join("; ")
}
