//! Checkout workflow from a shopper's cart to a recorded order.

#![allow(clippy::unwrap_used)]

use herbal_garden_core::ProductId;
use herbal_garden_integration_tests::CheckoutHarness;
use herbal_garden_storefront::db::OrderStore;
use herbal_garden_storefront::models::NewOrder;
use herbal_garden_storefront::services::checkout::{CheckoutError, CheckoutErrorKind};
use rust_decimal::Decimal;

fn harness() -> CheckoutHarness {
    // Ashwagandha Capsules, Tulsi Tea, Neem Face Wash, Amla Candy
    CheckoutHarness::with_catalog(&[(1, "24.99"), (3, "12.99"), (5, "9.99"), (11, "6.99")])
}

async fn paid_intent(h: &CheckoutHarness) -> String {
    let issued = h.service().create_intent(h.session()).await.unwrap();
    h.gateway.mark_succeeded(&issued.payment_intent_id);
    issued.payment_intent_id
}

#[tokio::test]
async fn duplicate_units_are_charged_and_recorded_per_unit() {
    let h = harness();
    h.set_cart(&[3, 1, 3]).await;

    let issued = h.service().create_intent(h.session()).await.unwrap();
    assert_eq!(issued.total, "50.97".parse::<Decimal>().unwrap());
    assert_eq!(h.gateway.created(&issued.payment_intent_id).unwrap().amount, 5097);

    h.gateway.mark_succeeded(&issued.payment_intent_id);
    let done = h
        .service()
        .complete_order(
            h.session(),
            CheckoutHarness::completion(&issued.payment_intent_id),
        )
        .await
        .unwrap();

    assert_eq!(done.item_count, 3);
    let orders = h.orders.all();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].payment_intent_id, issued.payment_intent_id);
    assert_eq!(orders[0].customer_email, "meera@example.org");
    assert_eq!(orders[0].total_amount, issued.total);
}

#[tokio::test]
async fn reissuing_an_intent_replaces_the_snapshot() {
    let h = harness();
    h.set_cart(&[1]).await;
    let first = h.service().create_intent(h.session()).await.unwrap();

    h.set_cart(&[1, 5]).await;
    let second = h.service().create_intent(h.session()).await.unwrap();
    assert_ne!(first.payment_intent_id, second.payment_intent_id);

    // The superseded intent no longer belongs to the session, even if paid
    h.gateway.mark_succeeded(&first.payment_intent_id);
    let err = h
        .service()
        .complete_order(h.session(), CheckoutHarness::completion(&first.payment_intent_id))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::IntentMismatch));

    h.gateway.mark_succeeded(&second.payment_intent_id);
    let done = h
        .service()
        .complete_order(h.session(), CheckoutHarness::completion(&second.payment_intent_id))
        .await
        .unwrap();
    assert_eq!(done.total, "34.98".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn price_change_after_payment_is_an_amount_mismatch() {
    let h = harness();
    h.set_cart(&[1, 11]).await;
    let intent = paid_intent(&h).await;

    h.catalog.set_price(11, "7.49".parse().unwrap());

    let err = h
        .service()
        .complete_order(h.session(), CheckoutHarness::completion(&intent))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::AmountMismatch {
            expected: 3248,
            charged: 3198
        }
    ));
    assert_eq!(err.kind(), CheckoutErrorKind::Integrity);
    assert!(h.orders.all().is_empty());
}

#[tokio::test]
async fn product_removed_from_catalog_after_payment_is_cart_modified() {
    let h = harness();
    h.set_cart(&[1, 5]).await;
    let intent = paid_intent(&h).await;

    h.catalog.remove(5);

    let err = h
        .service()
        .complete_order(h.session(), CheckoutHarness::completion(&intent))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::CartModified));
    assert!(h.orders.all().is_empty());
    // The session keeps the cart so the shopper can review it
    assert_eq!(h.session().cart().await.unwrap().len(), 2);
}

#[tokio::test]
async fn adding_an_item_after_payment_is_cart_modified() {
    let h = harness();
    h.set_cart(&[3]).await;
    let intent = paid_intent(&h).await;

    h.set_cart(&[3, 3]).await;

    let err = h
        .service()
        .complete_order(h.session(), CheckoutHarness::completion(&intent))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::CartModified));
}

#[tokio::test]
async fn gateway_refusal_surfaces_provider_message() {
    let h = harness();
    h.set_cart(&[1]).await;
    h.gateway.fail_next_create("Amount must be at least $0.50 usd");

    let err = h.service().create_intent(h.session()).await.unwrap_err();
    assert_eq!(err.kind(), CheckoutErrorKind::Gateway);
    assert!(err.to_string().contains("Amount must be at least"));
    assert!(h.session().pending_payment().await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_completions_record_exactly_one_order() {
    let h = harness();
    h.set_cart(&[1, 3]).await;
    let intent = paid_intent(&h).await;

    let service = h.service();
    let (first, second) = tokio::join!(
        service.complete_order(h.session(), CheckoutHarness::completion(&intent)),
        service.complete_order(h.session(), CheckoutHarness::completion(&intent)),
    );

    let successes = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(successes, 1);
    for result in [first, second] {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    CheckoutError::CheckoutInProgress | CheckoutError::IntentMismatch
                ),
                "unexpected error {err:?}"
            );
        }
    }
    assert_eq!(h.orders.all().len(), 1);
    assert!(!h.in_flight.contains(&intent));
}

#[tokio::test]
async fn intent_already_recorded_is_an_order_conflict() {
    let h = harness();
    h.set_cart(&[5]).await;
    let intent = paid_intent(&h).await;

    // Another process recorded this intent first
    h.orders
        .record_completed(&NewOrder {
            customer_name: "Earlier Request".to_owned(),
            customer_email: "earlier@example.org".to_owned(),
            total_amount: "9.99".parse().unwrap(),
            items: vec![ProductId::new(5)],
            payment_intent_id: intent.clone(),
        })
        .await
        .unwrap();

    let err = h
        .service()
        .complete_order(h.session(), CheckoutHarness::completion(&intent))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::OrderConflict(_)));
    assert_eq!(err.kind(), CheckoutErrorKind::Conflict);
    assert_eq!(h.orders.all().len(), 1);
}
