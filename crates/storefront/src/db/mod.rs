//! Database operations for the storefront `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `plants` / `products` - Catalog (read-only here)
//! - `orders` - Completed checkouts, one per verified payment intent
//! - `community_submissions` - Visitor plant submissions awaiting moderation
//! - `analytics` - Best-effort usage events
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations live in `migrations/` at the workspace root and are run via:
//! ```bash
//! cargo run -p herbal-garden-cli -- migrate
//! ```

pub mod analytics;
pub mod catalog;
pub mod orders;
pub mod submissions;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use herbal_garden_core::{OrderId, ProductId};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::models::NewOrder;

pub use analytics::AnalyticsRepository;
pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use submissions::SubmissionRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., payment intent already recorded).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Read access to catalog prices.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Current unit price of every listed product that exists.
    ///
    /// Ids with no catalog row are absent from the map.
    async fn prices_for(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Decimal>, RepositoryError>;

    /// Whether a product exists.
    async fn product_exists(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

/// Append-only store of completed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a completed order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the payment intent was already
    /// recorded or the catalog no longer prices the items at `total_amount`.
    async fn record_completed(&self, order: &NewOrder) -> Result<OrderId, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
