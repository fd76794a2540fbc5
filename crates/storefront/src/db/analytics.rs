//! Analytics event storage.

use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use super::RepositoryError;

/// Repository for analytics events.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append one event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(&self, event_type: &str, data: &Value) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO analytics (event_type, event_data) VALUES ($1, $2)")
            .bind(event_type)
            .bind(Json(data))
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
