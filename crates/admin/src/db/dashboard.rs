//! Dashboard queries.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DashboardStore, RepositoryError};
use crate::models::{DashboardStats, RecentOrder};

/// Number of orders listed on the dashboard.
pub const RECENT_ORDERS_LIMIT: i64 = 10;

/// Repository for dashboard figures.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    #[must_use]
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }
}

#[async_trait]
impl DashboardStore for DashboardRepository {
    async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r"
            SELECT
                (SELECT COUNT(*) FROM plants) AS plant_count,
                (SELECT COUNT(*) FROM products) AS product_count,
                (SELECT COUNT(*) FROM orders WHERE status = 'completed') AS order_count,
                (SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE status = 'completed')
                    AS revenue
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn recent_orders(&self) -> Result<Vec<RecentOrder>, RepositoryError> {
        let orders = sqlx::query_as::<_, RecentOrder>(
            r"
            SELECT id, customer_name, customer_email, total_amount, status, created_at
            FROM orders
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(RECENT_ORDERS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
