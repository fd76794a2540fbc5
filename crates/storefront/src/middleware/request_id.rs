//! Request correlation ids.
//!
//! Each request carries an `x-request-id`, taken from the upstream proxy when
//! it looks sane and generated otherwise. The id is recorded on the
//! `http_request` span and tagged on the Sentry scope, so a failed checkout
//! can be matched with the shopper's report. It is echoed on the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Accept an upstream id only if it is short and header/log safe.
fn upstream_id(value: &HeaderValue) -> Option<&str> {
    let id = value.to_str().ok()?;
    let well_formed = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    well_formed.then_some(id)
}

pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(upstream_id)
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn router() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(request_id_middleware))
    }

    async fn echoed(header: Option<&str>) -> String {
        let mut request = axum::http::Request::get("/");
        if let Some(value) = header {
            request = request.header(REQUEST_ID_HEADER, value);
        }
        let response = router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn test_upstream_id_is_kept() {
        assert_eq!(echoed(Some("cf-7d2a91.edge")).await, "cf-7d2a91.edge");
    }

    #[tokio::test]
    async fn test_missing_id_is_generated() {
        let id = echoed(None).await;
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_malformed_upstream_id_is_replaced() {
        let id = echoed(Some("abc def<script>")).await;
        assert!(Uuid::parse_str(&id).is_ok());

        let id = echoed(Some(&"a".repeat(MAX_UPSTREAM_ID_LEN + 1))).await;
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
