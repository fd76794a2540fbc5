//! Session-related types.
//!
//! The checkout workflow never reads the session directly. Handlers wrap the
//! request's [`Session`] in a [`CheckoutSession`] and pass that in, so the
//! workflow can be driven by an in-memory store in tests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use herbal_garden_core::Cart;

/// Session keys for shopper state.
pub mod keys {
    /// Product ids in the cart, one entry per unit.
    pub const CART: &str = "cart";

    /// The payment intent most recently issued for this session.
    pub const PENDING_PAYMENT: &str = "pending_payment";
}

/// Price snapshot taken when a payment intent is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub payment_intent_id: String,
    /// Fingerprint of the resolved cart at intent creation.
    pub cart_hash: String,
    pub cart_total: Decimal,
}

/// Typed view over the checkout-related parts of a session.
#[derive(Clone, Copy)]
pub struct CheckoutSession<'a> {
    session: &'a Session,
}

impl<'a> CheckoutSession<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// The current cart; empty when none was stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or the stored value is malformed.
    pub async fn cart(&self) -> Result<Cart, tower_sessions::session::Error> {
        Ok(self
            .session
            .get::<Cart>(keys::CART)
            .await?
            .unwrap_or_default())
    }

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save_cart(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::CART, cart).await
    }

    /// The outstanding payment snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or the stored value is malformed.
    pub async fn pending_payment(
        &self,
    ) -> Result<Option<PendingPayment>, tower_sessions::session::Error> {
        self.session.get(keys::PENDING_PAYMENT).await
    }

    /// Store a payment snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_pending_payment(
        &self,
        pending: &PendingPayment,
    ) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::PENDING_PAYMENT, pending).await
    }

    /// Empty the cart and drop the pending payment.
    ///
    /// Both changes land in the same session record, which is persisted once
    /// when the response is produced.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear_checkout(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::CART, Cart::new()).await?;
        self.session
            .remove::<PendingPayment>(keys::PENDING_PAYMENT)
            .await?;
        Ok(())
    }
}
