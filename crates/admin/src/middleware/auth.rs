//! Authentication extractor for admin routes.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::error::AppError;
use crate::services::auth::{AdminIdentity, AuthError, BasicCredentials};
use crate::state::AppState;

/// Extractor that requires valid admin credentials.
///
/// Runs before any body extractor, so an unauthenticated request is rejected
/// with 401 before CSRF or payload checks happen.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> String {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdmin(pub AdminIdentity);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let credentials = BasicCredentials::from_headers(&parts.headers)?;

        match state.authenticator().authenticate(&credentials).await {
            Some(admin) => {
                sentry::configure_scope(|scope| {
                    scope.set_user(Some(sentry::User {
                        username: Some(admin.username.clone()),
                        ..Default::default()
                    }));
                });
                Ok(Self(admin))
            }
            None => {
                tracing::warn!(
                    username = %credentials.username,
                    path = %parts.uri.path(),
                    "Rejected admin credentials"
                );
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }
}
