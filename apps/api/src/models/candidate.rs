use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A single position extracted from the CV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub company: String,
    pub role: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// Structured extraction of a CV. Fields the model omits default to empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvAnalysis {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
}

/// A candidate and their CV extraction. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Object storage key of the uploaded CV document.
    pub cv_key: String,
    pub cv_analysis: CvAnalysis,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a candidate.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub cv_key: String,
    pub cv_analysis: CvAnalysis,
}

#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cv_key: String,
    pub cv_analysis: Json<CvAnalysis>,
    pub created_at: DateTime<Utc>,
}

impl From<CandidateRow> for CandidateProfile {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            cv_key: row.cv_key,
            cv_analysis: row.cv_analysis.0,
            created_at: row.created_at,
        }
    }
}
