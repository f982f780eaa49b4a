use anyhow::{bail, Context, Result};

use crate::interview::phase::{PhasePolicy, DEFAULT_CLOSING_MESSAGE, DEFAULT_CLOSING_PHRASES};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Lifetime of presigned CV download URLs.
    pub cv_url_ttl_secs: u64,
    /// CV text is truncated to this many characters before extraction.
    pub cv_max_chars: usize,
    pub interview: PhasePolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            cv_url_ttl_secs: parse_env("CV_URL_TTL_SECS", 3600)?,
            cv_max_chars: parse_env("CV_MAX_CHARS", 30_000)?,
            interview: interview_policy_from_env()?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Builds the phase thresholds and closing vocabulary from `INTERVIEW_*` variables.
fn interview_policy_from_env() -> Result<PhasePolicy> {
    let soft_skills_from = parse_env("INTERVIEW_SOFT_SKILLS_AFTER", 8)?;
    let max_turns = parse_env("INTERVIEW_MAX_TURNS", 12)?;
    if soft_skills_from >= max_turns {
        bail!(
            "INTERVIEW_SOFT_SKILLS_AFTER ({soft_skills_from}) must be less than INTERVIEW_MAX_TURNS ({max_turns})"
        );
    }

    let closing_phrases = match optional_env("INTERVIEW_CLOSING_PHRASES") {
        Some(raw) => parse_phrase_list(&raw),
        None => DEFAULT_CLOSING_PHRASES.iter().map(|p| p.to_string()).collect(),
    };

    Ok(PhasePolicy {
        soft_skills_from,
        max_turns,
        closing_phrases,
        closing_message: optional_env("INTERVIEW_CLOSING_MESSAGE")
            .unwrap_or_else(|| DEFAULT_CLOSING_MESSAGE.to_string()),
    })
}

fn parse_phrase_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
