use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::store::{session_completed, session_not_found, InterviewStore};
use crate::models::candidate::{CandidateProfile, CandidateRow, NewCandidate};
use crate::models::interview::{
    Assessment, InterviewRow, InterviewSession, MessageRow, Role, SessionStatus, Turn,
};

/// PostgreSQL-backed interview store.
#[derive(Clone)]
pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn create_candidate(&self, candidate: NewCandidate) -> Result<CandidateProfile, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates (id, name, email, cv_key, cv_analysis)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, cv_key, cv_analysis, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.cv_key)
        .bind(Json(&candidate.cv_analysis))
        .fetch_one(&self.pool)
        .await?;

        info!("Created candidate {}", row.id);
        Ok(row.into())
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateProfile>, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            "SELECT id, name, email, cv_key, cv_analysis, created_at FROM candidates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn create_session(&self, candidate_id: Uuid) -> Result<InterviewSession, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            INSERT INTO interviews (id, candidate_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, candidate_id, status, technical_score, soft_skill_score,
                      report, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate_id)
        .bind(SessionStatus::InProgress.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!("Created interview {} for candidate {candidate_id}", row.id);
        Ok(InterviewSession::try_from(row)?)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<InterviewSession>, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT id, candidate_id, status, technical_score, soft_skill_score,
                   report, created_at, updated_at
            FROM interviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(InterviewSession::try_from).transpose()?)
    }

    async fn list_turns(&self, session_id: Uuid) -> Result<Vec<Turn>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, interview_id, role, content, created_at
            FROM messages
            WHERE interview_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Turn::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn append_turn(
        &self,
        session_id: Uuid,
        role: Role,
        content: &str,
    ) -> Result<Turn, AppError> {
        // The UPDATE locks the session row, so a concurrent completion either commits
        // before this insert (and the insert is skipped) or waits for it.
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            WITH live AS (
                UPDATE interviews
                SET updated_at = now()
                WHERE id = $2 AND status = 'in_progress'
                RETURNING id
            )
            INSERT INTO messages (id, interview_id, role, content)
            SELECT $1, live.id, $3, $4 FROM live
            RETURNING id, interview_id, role, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(role.as_str())
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Turn::try_from(row)?),
            None => match self.get_session(session_id).await? {
                Some(_) => Err(session_completed(session_id)),
                None => Err(session_not_found(session_id)),
            },
        }
    }

    async fn complete_session(
        &self,
        session_id: Uuid,
        assessment: &Assessment,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE interviews
            SET status = 'completed',
                technical_score = $2,
                soft_skill_score = $3,
                report = $4,
                updated_at = now()
            WHERE id = $1 AND status = 'in_progress'
            "#,
        )
        .bind(session_id)
        .bind(assessment.technical_score)
        .bind(assessment.soft_skill_score)
        .bind(Json(assessment))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
