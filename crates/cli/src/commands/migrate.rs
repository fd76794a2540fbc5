//! Database migration command.
//!
//! Migrations are the SQL files in `migrations/` at the workspace root,
//! embedded into the binary at compile time:
//!
//! ```text
//! migrations/
//! ├── 20260101000001_create_catalog.sql
//! ├── 20260101000002_create_orders.sql
//! ├── 20260101000003_create_community_submissions.sql
//! ├── 20260101000004_create_analytics.sql
//! └── 20260101000005_create_sessions.sql
//! ```
//!
//! The storefront and admin never migrate on startup; run this first.

use sqlx::PgPool;

use super::CommandError;

/// Apply every pending migration.
///
/// # Errors
///
/// Returns an error if a migration fails or was modified after being applied.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    tracing::info!("Running migrations...");
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
