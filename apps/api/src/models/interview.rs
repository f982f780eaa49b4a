use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(anyhow!("unknown interview status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(anyhow!("unknown message role '{other}'")),
        }
    }
}

/// One utterance in an interview transcript. Never edited once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A scored category of the final report. `score` is validated to lie in 1..=10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: u8,
    pub notes: String,
}

/// End-of-interview report, written once when the session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub technical: Vec<CategoryScore>,
    pub soft_skills: Vec<CategoryScore>,
    pub overall: String,
    pub technical_score: i32,
    pub soft_skill_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub status: SessionStatus,
    pub technical_score: Option<i32>,
    pub soft_skill_score: Option<i32>,
    pub report: Option<Assessment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub status: String,
    pub technical_score: Option<i32>,
    pub soft_skill_score: Option<i32>,
    pub report: Option<Json<Assessment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InterviewRow> for InterviewSession {
    type Error = anyhow::Error;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            candidate_id: row.candidate_id,
            status: row.status.parse()?,
            technical_score: row.technical_score,
            soft_skill_score: row.soft_skill_score,
            report: row.report.map(|r| r.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Turn {
    type Error = anyhow::Error;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            session_id: row.interview_id,
            role: row.role.parse()?,
            content: row.content,
            timestamp: row.created_at,
        })
    }
}
