//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Health check (open)
//! GET  /                                     - Redirect to /admin
//! GET  /admin                                - Dashboard (auth)
//! GET  /api/analytics                        - Event report (auth)
//! POST /api/admin/approve-submission/{id}    - Approve submission (auth + CSRF)
//! POST /api/admin/reject-submission/{id}     - Reject submission (auth + CSRF)
//! ```

pub mod analytics;
pub mod dashboard;
pub mod health;
pub mod moderation;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(|| async { Redirect::to("/admin") }))
        .route("/admin", get(dashboard::dashboard))
        .route("/api/analytics", get(analytics::report))
        .route(
            "/api/admin/approve-submission/{id}",
            post(moderation::approve),
        )
        .route(
            "/api/admin/reject-submission/{id}",
            post(moderation::reject),
        )
}
