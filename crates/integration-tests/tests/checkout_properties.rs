//! Pricing and fingerprint invariants over generated carts.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use herbal_garden_core::{Cart, CartFingerprint, CartQuote, CurrencyCode, ProductId};
use herbal_garden_integration_tests::CheckoutHarness;
use herbal_garden_storefront::services::checkout::CheckoutError;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Catalog ids 1..=8 with prices in cents.
const CATALOG: &[(i32, i64)] = &[
    (1, 2499),
    (2, 1899),
    (3, 1299),
    (4, 1599),
    (5, 999),
    (6, 1999),
    (7, 2299),
    (8, 899),
];

fn price_map() -> HashMap<ProductId, Decimal> {
    CATALOG
        .iter()
        .map(|(id, cents)| (ProductId::new(*id), Decimal::new(*cents, 2)))
        .collect()
}

fn harness() -> CheckoutHarness {
    let prices: Vec<(i32, String)> = CATALOG
        .iter()
        .map(|(id, cents)| (*id, Decimal::new(*cents, 2).to_string()))
        .collect();
    let borrowed: Vec<(i32, &str)> = prices.iter().map(|(id, p)| (*id, p.as_str())).collect();
    CheckoutHarness::with_catalog(&borrowed)
}

/// Carts drawing from known ids plus a few that are not in the catalog.
fn cart_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(1i32..=11, 0..12)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn fingerprint_ignores_order(ids in cart_strategy()) {
        let forward: Vec<ProductId> = ids.iter().copied().map(ProductId::new).collect();
        let mut backward = forward.clone();
        backward.reverse();

        prop_assert_eq!(CartFingerprint::of(&forward), CartFingerprint::of(&backward));
        prop_assert_eq!(CartFingerprint::of(&forward).as_str().len(), 64);
    }

    #[test]
    fn fingerprint_changes_when_an_item_is_added(ids in cart_strategy(), extra in 1i32..=8) {
        let before: Vec<ProductId> = ids.iter().copied().map(ProductId::new).collect();
        let mut after = before.clone();
        after.push(ProductId::new(extra));

        prop_assert_ne!(CartFingerprint::of(&before), CartFingerprint::of(&after));
    }

    #[test]
    fn quote_sums_only_catalog_entries(ids in cart_strategy()) {
        let cart: Cart = ids.iter().copied().map(ProductId::new).collect();
        let quote = CartQuote::compute(&cart, &price_map());

        let expected_cents: i64 = ids
            .iter()
            .filter_map(|id| CATALOG.iter().find(|(known, _)| known == id))
            .map(|(_, cents)| cents)
            .sum();
        let known = ids.iter().filter(|id| **id <= 8).count();

        prop_assert_eq!(quote.total, Decimal::new(expected_cents, 2));
        prop_assert_eq!(quote.item_count(), known);
        prop_assert_eq!(quote.amount_minor(CurrencyCode::USD).unwrap(), expected_cents);
        prop_assert_eq!(&quote.fingerprint, &CartFingerprint::of(&quote.resolved));
    }

    #[test]
    fn recorded_order_matches_the_charged_amount(ids in cart_strategy()) {
        let h = harness();
        let outcome: Result<_, CheckoutError> = runtime().block_on(async {
            h.set_cart(&ids).await;
            let issued = h.service().create_intent(h.session()).await?;
            h.gateway.mark_succeeded(&issued.payment_intent_id);
            let charged = h.gateway.created(&issued.payment_intent_id).unwrap().amount;
            h.service()
                .complete_order(
                    h.session(),
                    CheckoutHarness::completion(&issued.payment_intent_id),
                )
                .await
                .map(|done| (done, charged))
        });

        let known = ids.iter().filter(|id| **id <= 8).count();
        match outcome {
            Ok((done, charged)) => {
                let orders = h.orders.all();
                prop_assert_eq!(orders.len(), 1);
                prop_assert_eq!(orders[0].total_amount, done.total);
                prop_assert_eq!(orders[0].items.len(), known);
                prop_assert_eq!(Decimal::new(charged, 2), done.total);
            }
            Err(err) => {
                // Only carts with nothing purchasable may fail
                prop_assert_eq!(known, 0);
                prop_assert!(matches!(
                    err,
                    CheckoutError::EmptyCart | CheckoutError::InvalidTotal
                ));
                prop_assert!(h.orders.all().is_empty());
            }
        }
    }
}
