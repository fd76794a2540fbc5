//! Unified error handling for admin.
//!
//! Every admin handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry; the client always receives `{"error": "<message>"}`.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::csrf::CsrfError;

/// Realm sent with the Basic authentication challenge.
pub const AUTH_REALM: &str = "Basic realm=\"Herbal Garden Admin\", charset=\"UTF-8\"";

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Credentials missing or rejected.
    #[error("{0}")]
    Unauthorized(#[from] AuthError),

    /// Anti-forgery token missing or wrong.
    #[error("{0}")]
    Csrf(#[from] CsrfError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The resource is not in a state that allows the action.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Csrf(CsrfError::Session(_))
        )
    }

    const fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Csrf(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        } else {
            tracing::warn!(error = %self, "Admin request rejected");
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if matches!(self, Self::Unauthorized(_)) {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Unauthorized(AuthError::MissingCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Csrf(CsrfError::Mismatch)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("submission 4".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("already moderated".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_sends_basic_challenge() {
        let response = AppError::Unauthorized(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.headers()[WWW_AUTHENTICATE], AUTH_REALM);

        let response = AppError::Csrf(CsrfError::Missing).into_response();
        assert!(!response.headers().contains_key(WWW_AUTHENTICATE));
    }
}
