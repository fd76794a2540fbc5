//! Checkout workflow.
//!
//! Binds a session cart to a payment intent and records the order exactly
//! once after the payment has been verified against the gateway's own record.
//!
//! ```text
//! CartOpen --create_intent--> IntentCreated --complete_order--> Completed
//!                                   ^   |
//!                                   +---+ create_intent again overwrites the snapshot
//! ```
//!
//! Every value that decides how much money moves (total, item set) is
//! recomputed from the catalog at completion and cross-checked with the
//! gateway. Nothing from the request body feeds into the recorded order
//! except the customer's name and email.

mod error;
mod in_flight;

use std::collections::HashMap;

use herbal_garden_core::{CurrencyCode, OrderId};
use rust_decimal::Decimal;
use tracing::instrument;

pub use error::{CheckoutError, CheckoutErrorKind};
pub use in_flight::{InFlightCheckouts, InFlightGuard};

use crate::db::{CatalogStore, OrderStore};
use crate::models::{CheckoutSession, NewOrder, PendingPayment};
use crate::services::payments::{
    CreateIntent, IntentStatus, METADATA_CART_HASH, METADATA_ITEM_COUNT, PaymentGateway,
    is_intent_id,
};
use crate::services::pricing::PricingEngine;

/// Result of a successful `create_intent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentIssued {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub total: Decimal,
}

/// Input to `complete_order`.
#[derive(Debug, Clone)]
pub struct CompleteOrderRequest {
    /// Intent id the browser claims it paid.
    pub payment_intent_id: String,
    pub customer_name: String,
    pub customer_email: String,
}

/// Result of a successful `complete_order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedOrder {
    pub order_id: OrderId,
    pub total: Decimal,
    pub item_count: usize,
}

/// Orchestrates intent creation and order completion.
pub struct CheckoutService<'a> {
    catalog: &'a dyn CatalogStore,
    orders: &'a dyn OrderStore,
    gateway: Option<&'a dyn PaymentGateway>,
    in_flight: &'a InFlightCheckouts,
    currency: CurrencyCode,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a dyn CatalogStore,
        orders: &'a dyn OrderStore,
        gateway: Option<&'a dyn PaymentGateway>,
        in_flight: &'a InFlightCheckouts,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            catalog,
            orders,
            gateway,
            in_flight,
            currency,
        }
    }

    fn gateway(&self) -> Result<&'a dyn PaymentGateway, CheckoutError> {
        self.gateway.ok_or(CheckoutError::PaymentNotConfigured)
    }

    /// Price the session cart and open a payment intent for it.
    ///
    /// Stores a [`PendingPayment`] snapshot in the session, replacing any
    /// earlier one, and returns the client secret for the browser.
    ///
    /// # Errors
    ///
    /// - `PaymentNotConfigured` when no gateway is available
    /// - `EmptyCart` / `InvalidTotal` when there is nothing to charge
    /// - `Gateway` when the provider refuses the intent
    #[instrument(skip_all)]
    pub async fn create_intent(
        &self,
        session: CheckoutSession<'_>,
    ) -> Result<IntentIssued, CheckoutError> {
        let gateway = self.gateway()?;

        let cart = session.cart().await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let quote = PricingEngine::new(self.catalog).quote(&cart).await?;
        if quote.total <= Decimal::ZERO {
            return Err(CheckoutError::InvalidTotal);
        }
        let amount = quote
            .amount_minor(self.currency)
            .map_err(|_| CheckoutError::InvalidTotal)?;
        if amount <= 0 {
            return Err(CheckoutError::InvalidTotal);
        }

        let metadata = HashMap::from([
            (
                METADATA_CART_HASH.to_string(),
                quote.fingerprint.as_str().to_string(),
            ),
            (
                METADATA_ITEM_COUNT.to_string(),
                quote.item_count().to_string(),
            ),
        ]);

        let created = gateway
            .create_intent(CreateIntent {
                amount,
                currency: self.currency,
                metadata,
            })
            .await?;

        session
            .set_pending_payment(&PendingPayment {
                payment_intent_id: created.id.clone(),
                cart_hash: quote.fingerprint.as_str().to_string(),
                cart_total: quote.total,
            })
            .await?;

        tracing::info!(
            payment_intent_id = %created.id,
            amount,
            item_count = quote.item_count(),
            "Payment intent issued"
        );

        Ok(IntentIssued {
            payment_intent_id: created.id,
            client_secret: created.client_secret,
            total: quote.total,
        })
    }

    /// Verify a paid intent against the session cart and record the order.
    ///
    /// Gates run in order and each one aborts with no order written:
    /// gateway configured and id well formed, no concurrent completion of
    /// the same intent, intent issued to this session, cart non-empty, cart
    /// unchanged since the intent was issued, then the gateway's status,
    /// amount and fingerprint. On success the cart and pending payment are
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckoutError`] of the first gate that fails.
    #[instrument(skip_all, fields(payment_intent_id = %request.payment_intent_id))]
    pub async fn complete_order(
        &self,
        session: CheckoutSession<'_>,
        request: CompleteOrderRequest,
    ) -> Result<CompletedOrder, CheckoutError> {
        let gateway = self.gateway()?;
        let intent_id = request.payment_intent_id.as_str();
        if !is_intent_id(intent_id) {
            tracing::warn!("Rejected malformed payment intent id");
            return Err(CheckoutError::PaymentNotConfigured);
        }

        let _claim = self
            .in_flight
            .try_acquire(intent_id)
            .ok_or(CheckoutError::CheckoutInProgress)?;

        let pending = session
            .pending_payment()
            .await?
            .filter(|p| p.payment_intent_id == intent_id)
            .ok_or(CheckoutError::IntentMismatch)?;

        let cart = session.cart().await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let quote = PricingEngine::new(self.catalog).quote(&cart).await?;
        if quote.fingerprint.as_str() != pending.cart_hash {
            tracing::warn!("Cart changed between intent creation and completion");
            return Err(CheckoutError::CartModified);
        }

        let intent = gateway.retrieve_intent(intent_id).await?;
        if intent.id != intent_id {
            tracing::warn!(returned = %intent.id, "Gateway returned a different payment intent");
            return Err(CheckoutError::CartVerification);
        }
        if intent.status != IntentStatus::Succeeded {
            return Err(CheckoutError::PaymentNotCompleted);
        }

        let expected = quote
            .amount_minor(self.currency)
            .map_err(|_| CheckoutError::InvalidTotal)?;
        if intent.amount != expected {
            tracing::warn!(
                expected,
                charged = intent.amount,
                "Charged amount does not match cart total"
            );
            return Err(CheckoutError::AmountMismatch {
                expected,
                charged: intent.amount,
            });
        }

        if intent.cart_hash() != Some(quote.fingerprint.as_str()) {
            tracing::warn!("Gateway cart fingerprint does not match cart");
            return Err(CheckoutError::CartVerification);
        }

        let order_id = self
            .orders
            .record_completed(&NewOrder {
                customer_name: request.customer_name,
                customer_email: request.customer_email,
                total_amount: quote.total,
                items: quote.resolved.clone(),
                payment_intent_id: request.payment_intent_id.clone(),
            })
            .await?;

        session.clear_checkout().await?;

        Ok(CompletedOrder {
            order_id,
            total: quote.total,
            item_count: quote.item_count(),
        })
    }
}
