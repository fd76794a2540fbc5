//! Cart pricing.
//!
//! A quote is always computed from authoritative catalog prices, never from
//! anything the client sent. Ids the catalog no longer knows are dropped, so
//! the total and the fingerprint describe the same set of items.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::types::{Cart, CartFingerprint, CurrencyCode, Price, PriceError, ProductId};

/// Priced view of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartQuote {
    /// Sum of catalog prices for every resolved entry.
    pub total: Decimal,
    /// Fingerprint of `resolved`.
    pub fingerprint: CartFingerprint,
    /// Cart entries that matched a catalog product, in cart order.
    pub resolved: Vec<ProductId>,
}

impl CartQuote {
    /// Price a cart against a product-to-price map.
    ///
    /// Duplicates count once per occurrence.
    #[must_use]
    pub fn compute(cart: &Cart, prices: &HashMap<ProductId, Decimal>) -> Self {
        let mut total = Decimal::ZERO;
        let mut resolved = Vec::with_capacity(cart.len());

        for id in cart.iter() {
            if let Some(price) = prices.get(id) {
                total += *price;
                resolved.push(*id);
            }
        }

        Self {
            total,
            fingerprint: CartFingerprint::of(&resolved),
            resolved,
        }
    }

    /// Number of resolved units.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.resolved.len()
    }

    /// Whether nothing in the cart resolved to a product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Total as a [`Price`] in the given currency.
    #[must_use]
    pub const fn price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.total, currency)
    }

    /// Total in minor units (cents for USD).
    ///
    /// # Errors
    ///
    /// Propagates [`PriceError`] from the conversion.
    pub fn amount_minor(&self, currency: CurrencyCode) -> Result<i64, PriceError> {
        self.price(currency).to_minor_units()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> HashMap<ProductId, Decimal> {
        HashMap::from([
            (ProductId::new(1), "10.00".parse().unwrap()),
            (ProductId::new(2), "5.00".parse().unwrap()),
            (ProductId::new(3), "0.333".parse().unwrap()),
        ])
    }

    fn cart(raw: &[i32]) -> Cart {
        raw.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn test_sums_every_occurrence() {
        let quote = CartQuote::compute(&cart(&[1, 2]), &catalog());
        assert_eq!(quote.total, "15.00".parse::<Decimal>().unwrap());
        assert_eq!(quote.amount_minor(CurrencyCode::USD), Ok(1500));

        let quote = CartQuote::compute(&cart(&[2, 2, 2]), &catalog());
        assert_eq!(quote.total, "15.00".parse::<Decimal>().unwrap());
        assert_eq!(quote.item_count(), 3);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let quote = CartQuote::compute(&cart(&[1, 99, 2]), &catalog());
        assert_eq!(quote.resolved, vec![ProductId::new(1), ProductId::new(2)]);
        assert_eq!(quote.fingerprint, CartFingerprint::of(&quote.resolved));
        assert_eq!(quote.item_count(), 2);
    }

    #[test]
    fn test_all_unknown_is_empty_zero() {
        let quote = CartQuote::compute(&cart(&[42]), &catalog());
        assert!(quote.is_empty());
        assert_eq!(quote.total, Decimal::ZERO);
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        let a = CartQuote::compute(&cart(&[2, 1, 2]), &catalog());
        let b = CartQuote::compute(&cart(&[1, 2, 2]), &catalog());
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.total, b.total);
    }

    #[test]
    fn test_minor_units_round_after_summing() {
        // 3 x 0.333 = 0.999 -> 100 cents
        let quote = CartQuote::compute(&cart(&[3, 3, 3]), &catalog());
        assert_eq!(quote.amount_minor(CurrencyCode::USD), Ok(100));
    }
}
