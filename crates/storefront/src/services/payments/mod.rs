//! Payment gateway abstraction.
//!
//! The checkout workflow only needs two operations from a gateway: create a
//! payment intent for an amount in minor units, and read an intent back by
//! id. [`PaymentGateway`] captures that seam; [`StripeClient`] is the
//! production implementation.

mod error;
mod stripe;

use std::collections::HashMap;

use async_trait::async_trait;
use herbal_garden_core::CurrencyCode;
use serde::Deserialize;

pub use error::PaymentError;
pub use stripe::StripeClient;

/// Metadata key holding the cart fingerprint on an intent.
pub const METADATA_CART_HASH: &str = "cart_hash";
/// Metadata key holding the number of units on an intent.
pub const METADATA_ITEM_COUNT: &str = "item_count";

const INTENT_ID_PREFIX: &str = "pi_";

/// Parameters for a new payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIntent {
    /// Amount in minor units (cents for USD).
    pub amount: i64,
    pub currency: CurrencyCode,
    pub metadata: HashMap<String, String>,
}

/// A freshly created intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIntent {
    pub id: String,
    /// Handed to the browser so it can confirm the payment.
    pub client_secret: String,
}

/// Lifecycle status of an intent as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[serde(other)]
    Unknown,
}

/// The gateway's own record of an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedIntent {
    pub id: String,
    pub status: IntentStatus,
    /// Amount in minor units.
    pub amount: i64,
    pub metadata: HashMap<String, String>,
}

impl RetrievedIntent {
    /// The cart fingerprint recorded when the intent was created.
    #[must_use]
    pub fn cart_hash(&self) -> Option<&str> {
        self.metadata.get(METADATA_CART_HASH).map(String::as_str)
    }
}

/// A payment provider capable of creating and retrieving payment intents.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for the given amount.
    async fn create_intent(&self, request: CreateIntent) -> Result<CreatedIntent, PaymentError>;

    /// Fetch the current state of an intent.
    async fn retrieve_intent(&self, id: &str) -> Result<RetrievedIntent, PaymentError>;
}

/// Whether `id` has the shape of a payment intent id (`pi_` followed by
/// ASCII alphanumerics or underscores).
#[must_use]
pub fn is_intent_id(id: &str) -> bool {
    id.strip_prefix(INTENT_ID_PREFIX).is_some_and(|rest| {
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_id_shape() {
        assert!(is_intent_id("pi_3MtwBwLkdIwHu7ix28a3tqPa"));
        assert!(is_intent_id("pi_test_123"));
        assert!(!is_intent_id("pi_"));
        assert!(!is_intent_id("ch_3MtwBwLkdIwHu7ix"));
        assert!(!is_intent_id("pi_abc/../refunds"));
        assert!(!is_intent_id("pi_abc?expand=1"));
        assert!(!is_intent_id(""));
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let status: IntentStatus = serde_json::from_str("\"requires_review\"").expect("status");
        assert_eq!(status, IntentStatus::Unknown);
        let status: IntentStatus = serde_json::from_str("\"succeeded\"").expect("status");
        assert_eq!(status, IntentStatus::Succeeded);
    }

    #[test]
    fn test_cart_hash_lookup() {
        let intent = RetrievedIntent {
            id: "pi_1".to_string(),
            status: IntentStatus::Succeeded,
            amount: 1500,
            metadata: HashMap::from([(METADATA_CART_HASH.to_string(), "abc".to_string())]),
        };
        assert_eq!(intent.cart_hash(), Some("abc"));
    }
}
