//! Admin Guard: every admin route needs credentials, and mutating routes
//! additionally need the session's CSRF token.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use herbal_garden_admin::app;
use herbal_garden_admin::state::AppState;
use herbal_garden_admin::testing::{self, ADMIN_PASSWORD, ADMIN_USERNAME, basic_auth};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

fn admin() -> Router {
    app(
        AppState::from_config(testing::config(), testing::lazy_pool()),
        MemoryStore::default(),
    )
}

async fn error_message(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["error"].as_str().unwrap().to_owned()
}

fn moderation(action: &str, authorization: Option<String>, body: &'static str) -> Request<Body> {
    let mut request = Request::post(format!("/api/admin/{action}-submission/7"))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }
    request.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn mutations_without_credentials_are_unauthorized() {
    for action in ["approve", "reject"] {
        let response = admin()
            .oneshot(moderation(action, None, r#"{"csrf_token": "x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{action}");
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}

#[tokio::test]
async fn credentials_are_checked_before_csrf() {
    // Wrong username, right password, and no token: still a 401, not a 403
    let response = admin()
        .oneshot(moderation(
            "approve",
            Some(basic_auth("admin", ADMIN_PASSWORD)),
            "{}",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, "Invalid credentials");
}

#[tokio::test]
async fn malformed_authorization_is_unauthorized() {
    let response = admin()
        .oneshot(moderation(
            "reject",
            Some("Basic not-base64!".to_owned()),
            "{}",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, "Malformed Authorization header");
}

#[tokio::test]
async fn valid_credentials_without_token_are_forbidden() {
    for body in ["", "{}", r#"{"csrf_token": ""}"#, "not json"] {
        let response = admin()
            .oneshot(moderation(
                "approve",
                Some(basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD)),
                body,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{body:?}");
        assert_eq!(error_message(response).await, "CSRF token missing");
    }
}

#[tokio::test]
async fn valid_credentials_with_foreign_token_are_forbidden() {
    // A token never issued to this session, sent by header
    let token = herbal_garden_core::CsrfToken::generate();
    let request = Request::post("/api/admin/reject-submission/7")
        .header(header::AUTHORIZATION, basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .header("x-csrf-token", token.as_str())
        .body(Body::empty())
        .unwrap();

    let response = admin().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_message(response).await, "CSRF token invalid");
}

#[tokio::test]
async fn read_only_routes_need_credentials_only() {
    for uri in ["/admin", "/api/analytics"] {
        let response = admin()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = admin()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
