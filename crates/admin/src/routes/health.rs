//! Health check endpoint.

/// Liveness check. Open to unauthenticated callers.
pub async fn health() -> &'static str {
    "ok"
}
