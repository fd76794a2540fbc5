//! Authentication error types.

use thiserror::Error;

/// Errors from checking the admin credential.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header was sent.
    #[error("Authentication required")]
    MissingCredentials,

    /// The header is not a well-formed `Basic` credential.
    #[error("Malformed Authorization header")]
    MalformedHeader,

    /// Username or password did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,
}
