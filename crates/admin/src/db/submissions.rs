//! Community submission moderation.

use async_trait::async_trait;
use herbal_garden_core::{ModerationDecision, SubmissionId, SubmissionStatus};
use sqlx::PgPool;

use super::{RepositoryError, SubmissionStore};
use crate::models::PendingSubmission;

/// Repository for moderating community submissions.
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    #[must_use]
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }
}

#[async_trait]
impl SubmissionStore for SubmissionRepository {
    async fn pending(&self) -> Result<Vec<PendingSubmission>, RepositoryError> {
        let submissions = sqlx::query_as::<_, PendingSubmission>(
            r"
            SELECT id, plant_name, scientific_name, description, submitted_by,
                   submitted_email, image_path, created_at
            FROM community_submissions
            WHERE status = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(SubmissionStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    /// The status check and the update are one statement, so two moderators
    /// acting at once cannot both succeed.
    async fn moderate(
        &self,
        id: SubmissionId,
        decision: ModerationDecision,
    ) -> Result<SubmissionStatus, RepositoryError> {
        let target = decision.target_status();

        let updated = sqlx::query_scalar::<_, SubmissionId>(
            r"
            UPDATE community_submissions
            SET status = $2
            WHERE id = $1 AND status = $3
            RETURNING id
            ",
        )
        .bind(id)
        .bind(target)
        .bind(SubmissionStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_some() {
            return Ok(target);
        }

        let current = sqlx::query_scalar::<_, SubmissionStatus>(
            "SELECT status FROM community_submissions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match current {
            None => Err(RepositoryError::NotFound),
            Some(status) => Err(RepositoryError::Conflict(format!(
                "submission {id} is already {status}"
            ))),
        }
    }
}
