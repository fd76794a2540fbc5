//! Analytics aggregation.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{AnalyticsReport, DailyActivity, EventStat};

/// Number of days in the daily activity series.
pub const DAILY_ACTIVITY_DAYS: i64 = 30;

/// Repository for reading the `analytics` table.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Event counts per type and per day for the most recent active days.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn report(&self) -> Result<AnalyticsReport, RepositoryError> {
        let event_stats = sqlx::query_as::<_, EventStat>(
            r"
            SELECT event_type, COUNT(*) AS count
            FROM analytics
            GROUP BY event_type
            ORDER BY count DESC, event_type
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let daily_activity = sqlx::query_as::<_, DailyActivity>(
            r"
            SELECT created_at::date AS date, COUNT(*) AS count
            FROM analytics
            GROUP BY created_at::date
            ORDER BY date DESC
            LIMIT $1
            ",
        )
        .bind(DAILY_ACTIVITY_DAYS)
        .fetch_all(self.pool)
        .await?;

        Ok(AnalyticsReport {
            event_stats,
            daily_activity,
        })
    }
}
