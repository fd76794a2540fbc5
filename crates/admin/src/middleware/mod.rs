//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing with status and latency)
//! 3. Session layer (tower-sessions, signed cookie, SameSite=Strict)
//! 4. Security headers (same-origin only CSP)
//!
//! Authentication is the [`RequireAdmin`] extractor rather than a layer so
//! `/health` stays open.

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::RequireAdmin;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, signing_key};
