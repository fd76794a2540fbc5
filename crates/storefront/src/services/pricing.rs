//! Cart pricing against the live catalog.

use herbal_garden_core::{Cart, CartQuote};

use crate::db::{CatalogStore, RepositoryError};

/// Prices carts using current catalog prices.
///
/// Called identically when an intent is created and when the order is
/// completed, so the two fingerprints can be compared byte for byte.
#[derive(Clone, Copy)]
pub struct PricingEngine<'a> {
    catalog: &'a dyn CatalogStore,
}

impl<'a> PricingEngine<'a> {
    #[must_use]
    pub const fn new(catalog: &'a dyn CatalogStore) -> Self {
        Self { catalog }
    }

    /// Quote a cart. Ids missing from the catalog are left out of both the
    /// total and the fingerprint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog lookup fails.
    pub async fn quote(&self, cart: &Cart) -> Result<CartQuote, RepositoryError> {
        let prices = self.catalog.prices_for(&cart.distinct_ids()).await?;
        Ok(CartQuote::compute(cart, &prices))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use herbal_garden_core::{CartFingerprint, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::testing::MemoryCatalog;

    #[tokio::test]
    async fn test_quote_skips_products_missing_from_catalog() {
        let catalog = MemoryCatalog::with_prices(&[(1, "10.00"), (2, "5.00")]);
        let cart: Cart = [1, 7, 2, 2]
            .into_iter()
            .map(ProductId::new)
            .collect();

        let quote = PricingEngine::new(&catalog).quote(&cart).await.unwrap();

        assert_eq!(quote.total, "20.00".parse::<Decimal>().unwrap());
        assert_eq!(
            quote.fingerprint,
            CartFingerprint::of(&[ProductId::new(1), ProductId::new(2), ProductId::new(2)])
        );
    }
}
