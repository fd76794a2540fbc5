//! Integration tests for Herbal Garden.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p herbal-garden-integration-tests
//! ```
//!
//! No database or network is needed: the checkout workflow runs against the
//! storefront's in-memory catalog, order store and payment gateway, and the
//! admin router is driven in-process with a lazily-connected pool.
//!
//! # Test Files
//!
//! - `checkout_workflow` - End-to-end intent creation and order completion
//! - `checkout_properties` - Pricing and fingerprint invariants over generated carts
//! - `admin_guard` - Authentication and CSRF enforcement on admin routes

use std::sync::Arc;

use herbal_garden_core::{Cart, CurrencyCode, ProductId};
use herbal_garden_storefront::models::CheckoutSession;
use herbal_garden_storefront::services::checkout::{
    CheckoutService, CompleteOrderRequest, InFlightCheckouts,
};
use herbal_garden_storefront::testing::{FakeGateway, MemoryCatalog, MemoryOrders};
use tower_sessions::{MemoryStore, Session};

/// A shopper session plus every collaborator the checkout needs.
pub struct CheckoutHarness {
    pub catalog: MemoryCatalog,
    pub orders: MemoryOrders,
    pub gateway: FakeGateway,
    pub in_flight: InFlightCheckouts,
    pub session: Session,
}

impl CheckoutHarness {
    /// Catalog with the given `(id, "price")` entries and an empty session.
    #[must_use]
    pub fn with_catalog(prices: &[(i32, &str)]) -> Self {
        Self {
            catalog: MemoryCatalog::with_prices(prices),
            orders: MemoryOrders::default(),
            gateway: FakeGateway::default(),
            in_flight: InFlightCheckouts::new(),
            session: Session::new(None, Arc::new(MemoryStore::default()), None),
        }
    }

    #[must_use]
    pub fn service(&self) -> CheckoutService<'_> {
        CheckoutService::new(
            &self.catalog,
            &self.orders,
            Some(&self.gateway),
            &self.in_flight,
            CurrencyCode::USD,
        )
    }

    #[must_use]
    pub fn session(&self) -> CheckoutSession<'_> {
        CheckoutSession::new(&self.session)
    }

    /// Replace the session cart.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory session rejects the write.
    pub async fn set_cart(&self, ids: &[i32]) {
        let cart: Cart = ids.iter().copied().map(ProductId::new).collect();
        self.session()
            .save_cart(&cart)
            .await
            .unwrap_or_else(|e| panic!("save cart: {e}"));
    }

    /// Completion request for `payment_intent_id` from a fixed shopper.
    #[must_use]
    pub fn completion(payment_intent_id: &str) -> CompleteOrderRequest {
        CompleteOrderRequest {
            payment_intent_id: payment_intent_id.to_owned(),
            customer_name: "Meera Iyer".to_owned(),
            customer_email: "meera@example.org".to_owned(),
        }
    }
}
