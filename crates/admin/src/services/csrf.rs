//! Anti-forgery tokens for mutating admin actions.
//!
//! A token is minted the first time the dashboard renders in a session and
//! stored under [`SESSION_KEY`]. Every mutating request must echo it, either
//! in the `X-CSRF-Token` header or as `csrf_token` in a JSON body.

use axum::http::HeaderMap;
use herbal_garden_core::CsrfToken;
use serde::Deserialize;
use thiserror::Error;
use tower_sessions::Session;

/// Session key holding the token.
pub const SESSION_KEY: &str = "csrf_token";

/// Request header that may carry the token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// CSRF validation failures.
#[derive(Debug, Error)]
pub enum CsrfError {
    /// The request carried no token.
    #[error("CSRF token missing")]
    Missing,

    /// The token does not match the session's token, or none was issued.
    #[error("CSRF token invalid")]
    Mismatch,

    /// Session storage failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Return the session's token, minting and storing one if absent.
///
/// # Errors
///
/// Returns `CsrfError::Session` if the session cannot be read or written.
pub async fn issue(session: &Session) -> Result<CsrfToken, CsrfError> {
    if let Some(token) = session.get::<CsrfToken>(SESSION_KEY).await? {
        return Ok(token);
    }

    let token = CsrfToken::generate();
    session.insert(SESSION_KEY, &token).await?;
    tracing::debug!("Issued CSRF token");
    Ok(token)
}

/// Check a presented token against the session's token.
///
/// # Errors
///
/// Returns `CsrfError::Missing` for an absent or empty token and
/// `CsrfError::Mismatch` when it differs from the issued one.
pub async fn verify(session: &Session, presented: Option<&str>) -> Result<(), CsrfError> {
    let presented = presented
        .filter(|token| !token.is_empty())
        .ok_or(CsrfError::Missing)?;

    let expected = session
        .get::<CsrfToken>(SESSION_KEY)
        .await?
        .ok_or(CsrfError::Mismatch)?;

    if expected.verify(presented) {
        Ok(())
    } else {
        Err(CsrfError::Mismatch)
    }
}

#[derive(Deserialize)]
struct CsrfBody {
    csrf_token: Option<String>,
}

/// Extract the presented token from the header, falling back to the body.
///
/// A body that is empty or not JSON simply yields no token.
#[must_use]
pub fn presented_token(headers: &HeaderMap, body: &[u8]) -> Option<String> {
    if let Some(token) = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(token.to_owned());
    }

    serde_json::from_slice::<CsrfBody>(body)
        .ok()
        .and_then(|body| body.csrf_token)
}
