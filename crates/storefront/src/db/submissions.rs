//! Community submission repository.

use herbal_garden_core::{SubmissionId, SubmissionStatus};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{CommunitySubmission, NewSubmission};

/// Number of submissions shown on the community page.
pub const RECENT_LIMIT: i64 = 50;

/// Repository for community submissions.
pub struct SubmissionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubmissionRepository<'a> {
    /// Create a new submission repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new submission in the `pending` state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, submission: &NewSubmission) -> Result<SubmissionId, RepositoryError> {
        let id = sqlx::query_scalar::<_, SubmissionId>(
            r"
            INSERT INTO community_submissions
                (plant_name, scientific_name, description, submitted_by, submitted_email,
                 image_path, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(&submission.plant_name)
        .bind(&submission.scientific_name)
        .bind(&submission.description)
        .bind(&submission.submitted_by)
        .bind(&submission.submitted_email)
        .bind(&submission.image_path)
        .bind(SubmissionStatus::Pending)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Most recent submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(&self) -> Result<Vec<CommunitySubmission>, RepositoryError> {
        let submissions = sqlx::query_as::<_, CommunitySubmission>(
            r"
            SELECT id, plant_name, scientific_name, description, submitted_by,
                   submitted_email, image_path, status, created_at
            FROM community_submissions
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(RECENT_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(submissions)
    }
}
