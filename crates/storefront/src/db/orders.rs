//! Order repository.

use std::collections::HashMap;

use async_trait::async_trait;
use herbal_garden_core::{Cart, CartQuote, OrderId, OrderStatus, ProductId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use super::{OrderStore, RepositoryError, conflict_on_unique};
use crate::models::NewOrder;

/// Repository for order writes.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository<'_> {
    /// Insert a completed order inside a transaction that first locks the
    /// catalog rows for the items and re-derives the total from them.
    async fn record_completed(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart: Cart = order.items.iter().copied().collect();
        let rows = sqlx::query_as::<_, (ProductId, Decimal)>(
            "SELECT id, price FROM products WHERE id = ANY($1) FOR SHARE",
        )
        .bind(cart.distinct_ids())
        .fetch_all(&mut *tx)
        .await?;
        let prices: HashMap<ProductId, Decimal> = rows.into_iter().collect();

        let quote = CartQuote::compute(&cart, &prices);
        if quote.total != order.total_amount || quote.item_count() != order.items.len() {
            return Err(RepositoryError::Conflict(
                "catalog changed while the order was being recorded".to_owned(),
            ));
        }

        let id = sqlx::query_scalar::<_, OrderId>(
            r"
            INSERT INTO orders
                (customer_name, customer_email, total_amount, items, stripe_payment_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(order.total_amount)
        .bind(Json(&order.items))
        .bind(&order.payment_intent_id)
        .bind(OrderStatus::Completed)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "payment intent already recorded"))?;

        tx.commit().await?;

        tracing::info!(
            order_id = %id,
            payment_intent_id = %order.payment_intent_id,
            total = %order.total_amount,
            item_count = order.items.len(),
            "Order recorded"
        );

        Ok(id)
    }
}
