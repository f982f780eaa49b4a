//! Assessment Synthesizer — turns a finished transcript into a validated, scored report.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::interview::collaborators::StructuredGenerator;
use crate::interview::prompts::{ASSESSMENT_PROMPT_TEMPLATE, ASSESSMENT_SYSTEM};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::strip_json_fences;
use crate::models::candidate::CvAnalysis;
use crate::models::interview::{Assessment, CategoryScore, Role, Turn};

const MIN_SCORE: i64 = 1;
const MAX_SCORE: i64 = 10;

/// Shape the model is instructed to emit.
#[derive(Debug, Deserialize)]
struct RawAssessment {
    technical: Vec<RawCategory>,
    #[serde(rename = "softSkills", alias = "soft_skills")]
    soft_skills: Vec<RawCategory>,
    overall: String,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    category: String,
    // i64 rejects fractional and string scores at parse time.
    score: i64,
    #[serde(default)]
    notes: String,
}

/// Builds the assessment prompt, asks the model for the report and validates it.
pub async fn synthesize(
    generator: &dyn StructuredGenerator,
    transcript: &[Turn],
    profile: &CvAnalysis,
) -> Result<Assessment, AppError> {
    let prompt = build_assessment_prompt(transcript, profile)?;
    let system = format!("{ASSESSMENT_SYSTEM} {JSON_ONLY_SYSTEM}");

    let raw = generator.generate_structured(&system, &prompt).await?;
    let assessment = parse_assessment(&raw)?;

    info!(
        "Assessment synthesized: technical={} soft_skills={} ({} + {} categories)",
        assessment.technical_score,
        assessment.soft_skill_score,
        assessment.technical.len(),
        assessment.soft_skills.len()
    );

    Ok(assessment)
}

pub fn build_assessment_prompt(transcript: &[Turn], profile: &CvAnalysis) -> Result<String, AppError> {
    let profile_json = serde_json::to_string_pretty(profile).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize CV profile: {e}"))
    })?;

    Ok(fill_template(
        ASSESSMENT_PROMPT_TEMPLATE,
        &[
            ("profile_json", &profile_json),
            ("transcript", &render_transcript(transcript)),
        ],
    ))
}

fn render_transcript(transcript: &[Turn]) -> String {
    transcript
        .iter()
        .map(|t| {
            let speaker = match t.role {
                Role::User => "Candidate",
                Role::Assistant => "Interviewer",
            };
            format!("{speaker}: {}", t.content.trim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses and validates the model's JSON reply.
pub fn parse_assessment(raw: &str) -> Result<Assessment, AppError> {
    let parsed: RawAssessment = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| AppError::MalformedAssessment(format!("Unexpected report shape: {e}")))?;

    let technical = validate_categories(parsed.technical, "technical")?;
    let soft_skills = validate_categories(parsed.soft_skills, "softSkills")?;

    Ok(Assessment {
        technical_score: mean_score(&technical),
        soft_skill_score: mean_score(&soft_skills),
        technical,
        soft_skills,
        overall: parsed.overall.trim().to_string(),
    })
}

fn validate_categories(raw: Vec<RawCategory>, list: &str) -> Result<Vec<CategoryScore>, AppError> {
    raw.into_iter()
        .map(|c| {
            if !(MIN_SCORE..=MAX_SCORE).contains(&c.score) {
                return Err(AppError::MalformedAssessment(format!(
                    "{list} category '{}' has score {} outside {MIN_SCORE}..={MAX_SCORE}",
                    c.category, c.score
                )));
            }
            Ok(CategoryScore {
                category: c.category,
                score: c.score as u8,
                notes: c.notes,
            })
        })
        .collect()
}

/// Rounded mean of the category scores. The mean of an empty list is 0.
pub fn mean_score(categories: &[CategoryScore]) -> i32 {
    if categories.is_empty() {
        return 0;
    }
    let total: u32 = categories.iter().map(|c| c.score as u32).sum();
    (total as f64 / categories.len() as f64).round() as i32
}
