//! Admin authentication.
//!
//! Every admin request carries HTTP Basic credentials that are checked
//! through the [`AdminAuthenticator`] trait. The only implementation today
//! compares against the single shared credential from configuration; call
//! sites depend on the trait so a user directory can replace it later.

mod basic;
mod error;

use async_trait::async_trait;
use herbal_garden_core::constant_time_eq;
use secrecy::{ExposeSecret, SecretString};

pub use basic::BasicCredentials;
pub use error::AuthError;

use crate::config::AdminCredentials;

/// The admin a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}

/// Decides whether presented credentials belong to an admin.
#[async_trait]
pub trait AdminAuthenticator: Send + Sync {
    /// Returns the admin identity when the credentials are accepted.
    async fn authenticate(&self, credentials: &BasicCredentials) -> Option<AdminIdentity>;
}

/// Accepts exactly one username/password pair.
pub struct SharedCredentialAuthenticator {
    username: String,
    password: SecretString,
}

impl SharedCredentialAuthenticator {
    #[must_use]
    pub const fn new(username: String, password: SecretString) -> Self {
        Self { username, password }
    }
}

impl From<&AdminCredentials> for SharedCredentialAuthenticator {
    fn from(credentials: &AdminCredentials) -> Self {
        Self::new(credentials.username.clone(), credentials.password.clone())
    }
}

#[async_trait]
impl AdminAuthenticator for SharedCredentialAuthenticator {
    async fn authenticate(&self, credentials: &BasicCredentials) -> Option<AdminIdentity> {
        // Both comparisons always run so timing does not reveal which field was wrong
        let username_ok =
            constant_time_eq(credentials.username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(
            credentials.password.expose_secret().as_bytes(),
            self.password.expose_secret().as_bytes(),
        );

        (username_ok & password_ok).then(|| AdminIdentity {
            username: self.username.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn presented(username: &str, password: &str) -> BasicCredentials {
        BasicCredentials {
            username: username.to_owned(),
            password: SecretString::from(password.to_owned()),
        }
    }

    fn authenticator() -> SharedCredentialAuthenticator {
        SharedCredentialAuthenticator::new(
            "admin".to_owned(),
            SecretString::from("Vq8rN2xLp4Tz"),
        )
    }

    #[tokio::test]
    async fn test_accepts_shared_credential() {
        let identity = authenticator()
            .authenticate(&presented("admin", "Vq8rN2xLp4Tz"))
            .await
            .unwrap();
        assert_eq!(identity.username, "admin");
    }

    #[tokio::test]
    async fn test_rejects_wrong_password_or_username() {
        let auth = authenticator();
        assert!(auth.authenticate(&presented("admin", "Vq8rN2xLp4T")).await.is_none());
        assert!(auth.authenticate(&presented("Admin", "Vq8rN2xLp4Tz")).await.is_none());
        assert!(auth.authenticate(&presented("", "")).await.is_none());
    }
}
