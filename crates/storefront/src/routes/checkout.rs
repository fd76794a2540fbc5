//! Checkout page and payment endpoints.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{CatalogRepository, OrderRepository};
use crate::error::{Result, add_breadcrumb};
use crate::models::CheckoutSession;
use crate::routes::catalog::ProductView;
use crate::services::analytics::{self, AnalyticsEvent};
use crate::services::checkout::{CheckoutService, CompleteOrderRequest};
use crate::services::pricing::PricingEngine;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/index.html")]
pub struct CheckoutTemplate {
    pub items: Vec<ProductView>,
    pub total: String,
    pub publishable_key: Option<String>,
}

/// Body of `POST /api/complete-order`.
#[derive(Debug, Deserialize)]
pub struct CompleteOrderBody {
    #[serde(alias = "payment_id")]
    pub payment_intent_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Show the cart with its authoritative total.
#[instrument(skip(state, session))]
pub async fn page(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = CheckoutSession::new(&session).cart().await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/shop").into_response());
    }

    let catalog = CatalogRepository::new(state.pool());
    let quote = PricingEngine::new(state.catalog()).quote(&cart).await?;
    let products = catalog.products_by_id(&cart.distinct_ids()).await?;

    let currency = state.config().currency;
    let items = cart
        .iter()
        .filter_map(|id| products.get(id).cloned())
        .map(|p| ProductView::from_listing(p, currency))
        .collect();

    Ok(CheckoutTemplate {
        items,
        total: quote.price(currency).display(),
        publishable_key: state
            .config()
            .stripe
            .as_ref()
            .map(|s| s.publishable_key.clone()),
    }
    .into_response())
}

fn service<'a>(state: &'a AppState, orders: &'a OrderRepository<'a>) -> CheckoutService<'a> {
    CheckoutService::new(
        state.catalog(),
        orders,
        state.gateway(),
        state.in_flight(),
        state.config().currency,
    )
}

/// Open a payment intent for the session cart.
///
/// The amount comes from the catalog; the request body is ignored.
#[instrument(skip(state, session))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool());

    let issued = service(&state, &orders)
        .create_intent(CheckoutSession::new(&session))
        .await?;
    add_breadcrumb(
        "checkout",
        "payment intent created",
        Some(&[("payment_intent_id", issued.payment_intent_id.as_str())]),
    );

    Ok(Json(json!({ "clientSecret": issued.client_secret })))
}

/// Verify the payment and record the order.
#[instrument(skip(state, session, body))]
pub async fn complete_order(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CompleteOrderBody>,
) -> Result<Json<Value>> {
    add_breadcrumb(
        "checkout",
        "complete order",
        Some(&[("payment_intent_id", body.payment_intent_id.as_str())]),
    );
    let orders = OrderRepository::new(state.pool());

    let completed = service(&state, &orders)
        .complete_order(
            CheckoutSession::new(&session),
            CompleteOrderRequest {
                payment_intent_id: body.payment_intent_id,
                customer_name: body.name,
                customer_email: body.email,
            },
        )
        .await?;

    analytics::record(
        state.pool(),
        AnalyticsEvent::OrderCompleted {
            order_id: completed.order_id,
            amount: completed.total,
            items_count: completed.item_count,
        },
    );

    Ok(Json(json!({ "success": true, "order_id": completed.order_id })))
}
