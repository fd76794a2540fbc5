//! Database operations for the admin console.
//!
//! The admin reads and moderates the same `PostgreSQL` database the
//! storefront writes to.
//!
//! ## Tables
//!
//! - `plants` / `products` - Counted for the dashboard
//! - `orders` - Completed checkouts (read-only here)
//! - `community_submissions` - Moderated here
//! - `analytics` - Aggregated into the analytics report
//!
//! # Migrations
//!
//! Migrations live in `migrations/` at the workspace root and are run via:
//! ```bash
//! cargo run -p herbal-garden-cli -- migrate
//! ```

pub mod analytics;
pub mod dashboard;
pub mod submissions;

use std::time::Duration;

use async_trait::async_trait;
use herbal_garden_core::{ModerationDecision, SubmissionId, SubmissionStatus};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use dashboard::DashboardRepository;
pub use submissions::SubmissionRepository;

use crate::models::{DashboardStats, PendingSubmission, RecentOrder};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The row exists but is not in a state that allows the change.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Figures shown on the dashboard.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Catalog counts plus completed order count and revenue.
    async fn stats(&self) -> Result<DashboardStats, RepositoryError>;

    /// Most recent orders of any status, newest first.
    async fn recent_orders(&self) -> Result<Vec<RecentOrder>, RepositoryError>;
}

/// Community submissions awaiting or under moderation.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Submissions still awaiting a decision, newest first.
    async fn pending(&self) -> Result<Vec<PendingSubmission>, RepositoryError>;

    /// Move a pending submission to the decision's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::Conflict` if the submission is no longer pending.
    /// The stored status is left untouched in both cases.
    async fn moderate(
        &self,
        id: SubmissionId,
        decision: ModerationDecision,
    ) -> Result<SubmissionStatus, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
