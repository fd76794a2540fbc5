//! In-memory stand-ins for the catalog, order store and payment gateway.
//!
//! Available to this crate's unit tests and, through the `testing` feature,
//! to the workspace integration tests.

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use herbal_garden_core::{CurrencyCode, OrderId, ProductId};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::{StorefrontConfig, generate_secret};
use crate::db::{CatalogStore, OrderStore, RepositoryError};
use crate::models::NewOrder;
use crate::services::payments::{
    CreateIntent, CreatedIntent, IntentStatus, PaymentError, PaymentGateway, RetrievedIntent,
};

/// Configuration with no gateway, no assistant and a random session secret.
#[must_use]
pub fn config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/herbal_garden_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 5000,
        base_url: "http://localhost:5000".to_owned(),
        session_secret: generate_secret(64),
        session_secret_generated: true,
        stripe: None,
        currency: CurrencyCode::USD,
        assistant: None,
        upload_dir: std::env::temp_dir().join("herbal-garden-test-uploads"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A pool that never connects until a query runs.
///
/// For router tests whose requests are rejected before touching the database.
#[must_use]
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/herbal_garden_test")
        .unwrap_or_else(|e| panic!("invalid test database url: {e}"))
}

/// Catalog backed by a price map.
#[derive(Default)]
pub struct MemoryCatalog {
    prices: Mutex<HashMap<ProductId, Decimal>>,
}

impl MemoryCatalog {
    /// Build from `(id, "price")` pairs.
    ///
    /// # Panics
    ///
    /// Panics if a price is not a valid decimal.
    #[must_use]
    pub fn with_prices(entries: &[(i32, &str)]) -> Self {
        let prices = entries
            .iter()
            .map(|(id, price)| {
                let price = price
                    .parse::<Decimal>()
                    .unwrap_or_else(|e| panic!("invalid fixture price {price}: {e}"));
                (ProductId::new(*id), price)
            })
            .collect();
        Self {
            prices: Mutex::new(prices),
        }
    }

    /// Change or add a product price.
    pub fn set_price(&self, id: i32, price: Decimal) {
        self.prices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ProductId::new(id), price);
    }

    /// Delete a product.
    pub fn remove(&self, id: i32) {
        self.prices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&ProductId::new(id));
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn prices_for(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Decimal>, RepositoryError> {
        let prices = self.prices.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(ids
            .iter()
            .filter_map(|id| prices.get(id).map(|price| (*id, *price)))
            .collect())
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self
            .prices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id))
    }
}

/// Order store that keeps rows in a vector and enforces intent uniqueness.
#[derive(Default)]
pub struct MemoryOrders {
    orders: Mutex<Vec<NewOrder>>,
}

impl MemoryOrders {
    /// Snapshot of every recorded order.
    #[must_use]
    pub fn all(&self) -> Vec<NewOrder> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OrderStore for MemoryOrders {
    async fn record_completed(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let mut orders = self.orders.lock().unwrap_or_else(PoisonError::into_inner);
        if orders
            .iter()
            .any(|o| o.payment_intent_id == order.payment_intent_id)
        {
            return Err(RepositoryError::Conflict(
                "payment intent already recorded".to_owned(),
            ));
        }
        orders.push(order.clone());
        let id = i32::try_from(orders.len())
            .map_err(|_| RepositoryError::DataCorruption("too many orders".to_owned()))?;
        Ok(OrderId::new(id))
    }
}

/// Payment gateway that keeps intents in memory.
///
/// New intents start as `requires_payment_method` with the requested amount
/// and metadata; tests then flip them to `succeeded` or tamper with them.
#[derive(Default)]
pub struct FakeGateway {
    created: Mutex<HashMap<String, CreateIntent>>,
    intents: Mutex<HashMap<String, RetrievedIntent>>,
    next_id: AtomicUsize,
    retrievals: AtomicUsize,
    fail_create: Mutex<Option<String>>,
}

impl FakeGateway {
    /// The request that created `id`.
    #[must_use]
    pub fn created(&self, id: &str) -> Option<CreateIntent> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn retrieved_count(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }

    /// Make the next `create_intent` fail with a provider message.
    pub fn fail_next_create(&self, message: &str) {
        *self
            .fail_create
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.to_owned());
    }

    pub fn mark_succeeded(&self, id: &str) {
        self.update(id, |intent| intent.status = IntentStatus::Succeeded);
    }

    pub fn set_amount(&self, id: &str, amount: i64) {
        self.update(id, |intent| intent.amount = amount);
    }

    pub fn set_metadata(&self, id: &str, key: &str, value: &str) {
        self.update(id, |intent| {
            intent.metadata.insert(key.to_owned(), value.to_owned());
        });
    }

    /// Make retrieval of `id` answer with an intent carrying `returned_id`.
    pub fn set_returned_id(&self, id: &str, returned_id: &str) {
        self.update(id, |intent| intent.id = returned_id.to_owned());
    }

    fn update(&self, id: &str, f: impl FnOnce(&mut RetrievedIntent)) {
        let mut intents = self.intents.lock().unwrap_or_else(PoisonError::into_inner);
        let intent = intents
            .get_mut(id)
            .unwrap_or_else(|| panic!("unknown fixture intent {id}"));
        f(intent);
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(&self, request: CreateIntent) -> Result<CreatedIntent, PaymentError> {
        if let Some(message) = self
            .fail_create
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            return Err(PaymentError::Api {
                error_type: "invalid_request_error".to_owned(),
                message,
            });
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("pi_fake_{n}");

        self.intents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id.clone(),
                RetrievedIntent {
                    id: id.clone(),
                    status: IntentStatus::RequiresPaymentMethod,
                    amount: request.amount,
                    metadata: request.metadata.clone(),
                },
            );
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), request);

        Ok(CreatedIntent {
            client_secret: format!("{id}_secret_fake"),
            id,
        })
    }

    async fn retrieve_intent(&self, id: &str) -> Result<RetrievedIntent, PaymentError> {
        self.retrievals.fetch_add(1, Ordering::SeqCst);
        self.intents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(id.to_owned()))
    }
}
