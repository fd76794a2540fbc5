//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Landing page
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Database readiness check
//!
//! # Catalog
//! GET  /garden                     - Plant listing
//! GET  /plant/{id}                 - Plant detail
//! GET  /shop                       - Product listing
//!
//! # Cart and checkout
//! POST /api/cart                   - Add, remove or read cart items (JSON)
//! GET  /checkout                   - Checkout page (redirects to /shop when empty)
//! POST /api/create-payment-intent  - Price the cart and open a payment intent
//! POST /api/complete-order         - Verify the payment and record the order
//!
//! # Assistant
//! GET  /chatbot                    - Chat page
//! POST /api/chat                   - Ask the herbal assistant
//! GET  /recognize                  - Plant recognition page
//! POST /api/recognize-plant        - Identify a plant from an image (multipart)
//!
//! # Community
//! GET  /community                  - Recent submissions
//! POST /api/submit-plant           - Submit a plant for moderation (multipart)
//! ```

pub mod assistant;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod community;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Every storefront route.
///
/// Session, tracing and security layers are applied by [`crate::app`].
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(catalog::index))
        .route("/garden", get(catalog::garden))
        .route("/plant/{id}", get(catalog::plant_detail))
        .route("/shop", get(catalog::shop))
        .route("/api/cart", post(cart::update_cart))
        .route("/checkout", get(checkout::page))
        .route(
            "/api/create-payment-intent",
            post(checkout::create_payment_intent),
        )
        .route("/api/complete-order", post(checkout::complete_order))
        .route("/chatbot", get(assistant::chatbot_page))
        .route("/api/chat", post(assistant::chat))
        .route("/recognize", get(assistant::recognize_page))
        .route("/api/recognize-plant", post(assistant::recognize_plant))
        .route("/community", get(community::index))
        .route("/api/submit-plant", post(community::submit_plant))
}
