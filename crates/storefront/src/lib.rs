//! Herbal Garden storefront library.
//!
//! This crate provides the public site as a library so the router and the
//! checkout workflow can be exercised from tests without a listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::state::AppState;

/// Directory holding stylesheets and scripts served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the storefront application over the given session store.
///
/// Sentry layers are added by the binary so tests run without a hub.
pub fn app<S>(state: AppState, store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer =
        middleware::create_session_layer(store, state.config().secure_cookies())
            .with_signed(middleware::signing_key(&state.config().session_secret));

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            },
        ))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use std::sync::Arc;

    use super::*;
    use crate::testing::{self, MemoryCatalog};

    fn test_app() -> Router {
        let catalog = Arc::new(MemoryCatalog::with_prices(&[(3, "12.99"), (5, "9.99")]));
        let state = AppState::new(testing::config(), testing::lazy_pool(), catalog, None, None);
        app(state, MemoryStore::default())
    }

    /// Send a cart request, carrying the session cookie across calls.
    async fn cart_call(app: &Router, cookie: &mut Option<String>, body: &str) -> (StatusCode, Value) {
        let mut request = Request::post("/api/cart").header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = cookie.as_deref() {
            request = request.header(header::COOKIE, value);
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::from(body.to_owned())).unwrap())
            .await
            .unwrap();

        if let Some(set) = response.headers().get(header::SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap();
            *cookie = Some(pair.to_owned());
        }
        let status = response.status();
        (status, json_body(response).await)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_security_headers_and_request_id() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert!(
            response.headers()[header::CONTENT_SECURITY_POLICY]
                .to_str()
                .unwrap()
                .contains("https://js.stripe.com")
        );
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_create_intent_without_gateway_fails_closed() {
        let response = test_app()
            .oneshot(post_json("/api/create-payment-intent", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Payments are not configured");
    }

    #[tokio::test]
    async fn test_complete_order_without_gateway_fails_closed() {
        let response = test_app()
            .oneshot(post_json(
                "/api/complete-order",
                r#"{"payment_intent_id": "pi_123", "name": "A", "email": "a@example.org", "amount": 0.01}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Payments are not configured");
    }

    #[tokio::test]
    async fn test_cart_get_and_unknown_action() {
        let response = test_app()
            .oneshot(post_json("/api/cart", r#"{"action": "get"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["cart_count"], 0);
        assert_eq!(body["cart"], Value::Array(vec![]));

        let response = test_app()
            .oneshot(post_json("/api/cart", r#"{"action": "empty"}"#))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_cart_rejects_products_missing_from_catalog() {
        let app = test_app();
        let mut cookie = None;

        let (status, body) =
            cart_call(&app, &mut cookie, r#"{"action": "add", "product_id": 42}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid product");

        let (status, body) = cart_call(&app, &mut cookie, r#"{"action": "add"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing product_id");

        let (_, body) = cart_call(&app, &mut cookie, r#"{"action": "get"}"#).await;
        assert_eq!(body["cart_count"], 0);
    }

    #[tokio::test]
    async fn test_cart_keeps_units_and_removes_one_at_a_time() {
        let app = test_app();
        let mut cookie = None;

        for id in [3, 5, 3] {
            let (status, body) = cart_call(
                &app,
                &mut cookie,
                &format!(r#"{{"action": "add", "product_id": {id}}}"#),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
        }

        let (_, body) =
            cart_call(&app, &mut cookie, r#"{"action": "remove", "product_id": 3}"#).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["cart_count"], 2);

        let (_, body) = cart_call(&app, &mut cookie, r#"{"action": "get"}"#).await;
        assert_eq!(body["cart"], serde_json::json!([5, 3]));
        assert_eq!(body["cart_count"], 2);

        // Removing something not in the cart leaves it alone
        let (_, body) =
            cart_call(&app, &mut cookie, r#"{"action": "remove", "product_id": 42}"#).await;
        assert_eq!(body["cart_count"], 2);
    }

    #[tokio::test]
    async fn test_chat_without_assistant_explains_itself() {
        let response = test_app()
            .oneshot(post_json("/api/chat", r#"{"message": "What is neem?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["response"],
            crate::services::assistant::CHAT_NOT_CONFIGURED
        );
    }

    #[tokio::test]
    async fn test_checkout_page_redirects_when_cart_empty() {
        let response = test_app()
            .oneshot(Request::get("/checkout").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/shop");
    }

    #[tokio::test]
    async fn test_invalid_submission_leaves_no_upload_behind() {
        let upload_dir = std::env::temp_dir().join(format!("hg-submit-{}", uuid::Uuid::new_v4()));
        let config = crate::config::StorefrontConfig {
            upload_dir: upload_dir.clone(),
            ..testing::config()
        };
        let catalog = Arc::new(MemoryCatalog::default());
        let app = app(
            AppState::new(config, testing::lazy_pool(), catalog, None, None),
            MemoryStore::default(),
        );

        let boundary = "hgboundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"description\"\r\n\r\n\
             Lemony leaves\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"balm.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             png-bytes\r\n\
             --{boundary}--\r\n"
        );
        let response = app
            .oneshot(
                Request::post("/api/submit-plant")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Plant name is required");
        assert!(!upload_dir.exists());
    }
}
