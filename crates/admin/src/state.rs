//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::{DashboardRepository, DashboardStore, SubmissionRepository, SubmissionStore};
use crate::services::auth::{AdminAuthenticator, SharedCredentialAuthenticator};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    authenticator: Arc<dyn AdminAuthenticator>,
    dashboard: Arc<dyn DashboardStore>,
    submissions: Arc<dyn SubmissionStore>,
}

impl AppState {
    /// Create state with explicit authenticator and stores.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        pool: PgPool,
        authenticator: Arc<dyn AdminAuthenticator>,
        dashboard: Arc<dyn DashboardStore>,
        submissions: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                authenticator,
                dashboard,
                submissions,
            }),
        }
    }

    /// Create state backed by `PostgreSQL` that authenticates against the
    /// configured shared credential.
    #[must_use]
    pub fn from_config(config: AdminConfig, pool: PgPool) -> Self {
        let authenticator = Arc::new(SharedCredentialAuthenticator::from(&config.credentials));
        let dashboard = Arc::new(DashboardRepository::new(&pool));
        let submissions = Arc::new(SubmissionRepository::new(&pool));
        Self::new(config, pool, authenticator, dashboard, submissions)
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn authenticator(&self) -> &dyn AdminAuthenticator {
        self.inner.authenticator.as_ref()
    }

    #[must_use]
    pub fn dashboard(&self) -> &dyn DashboardStore {
        self.inner.dashboard.as_ref()
    }

    #[must_use]
    pub fn submissions(&self) -> &dyn SubmissionStore {
        self.inner.submissions.as_ref()
    }
}
