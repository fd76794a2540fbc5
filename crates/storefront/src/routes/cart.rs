//! Session cart API.
//!
//! The cart is a list of product ids in the session, one entry per unit.

use axum::{Json, extract::State};
use herbal_garden_core::ProductId;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::CheckoutSession;
use crate::state::AppState;

/// Cart operation requested by the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    #[default]
    Add,
    Remove,
    Get,
    #[serde(other)]
    Unknown,
}

/// Body of `POST /api/cart`.
#[derive(Debug, Deserialize)]
pub struct CartRequest {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub action: CartAction,
}

/// Add, remove or read cart items.
#[instrument(skip(state, session))]
pub async fn update_cart(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CartRequest>,
) -> Result<Json<Value>> {
    let checkout = CheckoutSession::new(&session);
    let mut cart = checkout.cart().await?;

    match request.action {
        CartAction::Add => {
            let id = request
                .product_id
                .ok_or_else(|| AppError::BadRequest("Missing product_id".to_string()))?;
            if !state.catalog().product_exists(id).await? {
                return Err(AppError::BadRequest("Invalid product".to_string()));
            }
            cart.add(id);
            checkout.save_cart(&cart).await?;
            add_breadcrumb("cart", "add", Some(&[("product_id", id.to_string().as_str())]));
            tracing::debug!(product_id = %id, cart_count = cart.len(), "Added to cart");
            Ok(Json(json!({ "success": true, "cart_count": cart.len() })))
        }
        CartAction::Remove => {
            if let Some(id) = request.product_id
                && cart.remove(id)
            {
                checkout.save_cart(&cart).await?;
                add_breadcrumb("cart", "remove", Some(&[("product_id", id.to_string().as_str())]));
            }
            Ok(Json(json!({ "success": true, "cart_count": cart.len() })))
        }
        CartAction::Get => Ok(Json(json!({ "cart": cart, "cart_count": cart.len() }))),
        CartAction::Unknown => Ok(Json(json!({ "success": false }))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_action_defaults_to_add() {
        let request: CartRequest = serde_json::from_str(r#"{"product_id": 3}"#).unwrap();
        assert_eq!(request.action, CartAction::Add);
        assert_eq!(request.product_id, Some(ProductId::new(3)));
    }

    #[test]
    fn test_unknown_action() {
        let request: CartRequest = serde_json::from_str(r#"{"action": "clear"}"#).unwrap();
        assert_eq!(request.action, CartAction::Unknown);
        assert!(request.product_id.is_none());
    }
}
