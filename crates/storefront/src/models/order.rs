//! Orders.

use herbal_garden_core::ProductId;
use rust_decimal::Decimal;

/// A verified checkout about to be persisted.
///
/// `total_amount` and `items` always come from the server-side quote, never
/// from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: Decimal,
    /// Resolved product ids, one entry per unit.
    pub items: Vec<ProductId>,
    pub payment_intent_id: String,
}
