//! Test configuration and in-memory stores for router tests.
//!
//! Available to this crate's unit tests and, through the `testing` feature,
//! to the workspace integration tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use herbal_garden_core::{CurrencyCode, ModerationDecision, SubmissionId, SubmissionStatus};
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::{AdminConfig, AdminCredentials, generate_secret};
use crate::db::{DashboardStore, RepositoryError, SubmissionStore};
use crate::models::{DashboardStats, PendingSubmission, RecentOrder};
use crate::services::auth::SharedCredentialAuthenticator;
use crate::state::AppState;

/// Username accepted by [`config`].
pub const ADMIN_USERNAME: &str = "moderator";

/// Password accepted by [`config`].
pub const ADMIN_PASSWORD: &str = "Zr4nW8qT2vLx6Kp";

/// Configuration accepting [`ADMIN_USERNAME`] / [`ADMIN_PASSWORD`].
#[must_use]
pub fn config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://localhost/herbal_garden_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 5001,
        base_url: "http://localhost:5001".to_owned(),
        session_secret: generate_secret(64),
        session_secret_generated: true,
        credentials: AdminCredentials {
            username: ADMIN_USERNAME.to_owned(),
            password: SecretString::from(ADMIN_PASSWORD),
            password_generated: false,
        },
        currency: CurrencyCode::USD,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A pool that never connects until a query runs.
///
/// # Panics
///
/// Panics if the hard-coded test URL fails to parse.
#[must_use]
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/herbal_garden_test")
        .unwrap_or_else(|e| panic!("invalid test database url: {e}"))
}

/// `Authorization` header value for the given credentials.
#[must_use]
pub fn basic_auth(username: &str, password: &str) -> String {
    use base64::Engine;
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"))
    )
}

/// State over [`config`], a lazy pool, an empty dashboard and `submissions`.
#[must_use]
pub fn state(submissions: Arc<MemorySubmissions>) -> AppState {
    let config = config();
    let authenticator = Arc::new(SharedCredentialAuthenticator::from(&config.credentials));
    AppState::new(
        config,
        lazy_pool(),
        authenticator,
        Arc::new(EmptyDashboard),
        submissions,
    )
}

/// Dashboard with no catalog and no orders.
pub struct EmptyDashboard;

#[async_trait]
impl DashboardStore for EmptyDashboard {
    async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        Ok(DashboardStats::default())
    }

    async fn recent_orders(&self) -> Result<Vec<RecentOrder>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Submission store keyed by id.
#[derive(Default)]
pub struct MemorySubmissions {
    rows: Mutex<BTreeMap<SubmissionId, (PendingSubmission, SubmissionStatus)>>,
}

impl MemorySubmissions {
    /// A store holding one pending submission per id.
    #[must_use]
    pub fn with_pending(ids: &[i32]) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap_or_else(PoisonError::into_inner);
            for &id in ids {
                let id = SubmissionId::new(id);
                rows.insert(id, (submission(id), SubmissionStatus::Pending));
            }
        }
        store
    }

    /// Current status of `id`, if it exists.
    #[must_use]
    pub fn status(&self, id: i32) -> Option<SubmissionStatus> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&SubmissionId::new(id))
            .map(|(_, status)| *status)
    }
}

fn submission(id: SubmissionId) -> PendingSubmission {
    PendingSubmission {
        id,
        plant_name: format!("Lemon Balm {id}"),
        scientific_name: Some("Melissa officinalis".to_owned()),
        description: Some("Calming tea herb".to_owned()),
        submitted_by: None,
        submitted_email: None,
        image_path: None,
        created_at: Utc
            .with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
            .single()
            .unwrap_or_default(),
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissions {
    async fn pending(&self) -> Result<Vec<PendingSubmission>, RepositoryError> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .values()
            .rev()
            .filter(|(_, status)| status.is_pending())
            .map(|(submission, _)| submission.clone())
            .collect())
    }

    async fn moderate(
        &self,
        id: SubmissionId,
        decision: ModerationDecision,
    ) -> Result<SubmissionStatus, RepositoryError> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let (_, status) = rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if !status.is_pending() {
            return Err(RepositoryError::Conflict(format!(
                "submission {id} is already {status}"
            )));
        }
        *status = decision.target_status();
        Ok(*status)
    }
}
