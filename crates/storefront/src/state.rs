//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{CatalogRepository, CatalogStore};
use crate::services::assistant::{AssistantClient, AssistantError};
use crate::services::checkout::InFlightCheckouts;
use crate::services::payments::{PaymentError, PaymentGateway, StripeClient};

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("payment client: {0}")]
    Payments(#[from] PaymentError),
    #[error("assistant client: {0}")]
    Assistant(#[from] AssistantError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: Arc<dyn CatalogStore>,
    gateway: Option<Arc<dyn PaymentGateway>>,
    assistant: Option<AssistantClient>,
    in_flight: InFlightCheckouts,
}

impl AppState {
    /// Create a new application state from already-built collaborators.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        pool: PgPool,
        catalog: Arc<dyn CatalogStore>,
        gateway: Option<Arc<dyn PaymentGateway>>,
        assistant: Option<AssistantClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                gateway,
                assistant,
                in_flight: InFlightCheckouts::new(),
            }),
        }
    }

    /// Build state with the Stripe and assistant clients the configuration
    /// enables.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn from_config(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let gateway = match &config.stripe {
            Some(stripe) => {
                Some(Arc::new(StripeClient::new(stripe)?) as Arc<dyn PaymentGateway>)
            }
            None => {
                tracing::warn!("STRIPE_SECRET_KEY not set; checkout is disabled");
                None
            }
        };

        let assistant = match &config.assistant {
            Some(assistant) => Some(AssistantClient::new(assistant)?),
            None => {
                tracing::warn!("OPENAI_API_KEY not set; assistant is disabled");
                None
            }
        };

        let catalog = Arc::new(CatalogRepository::new(&pool));
        Ok(Self::new(config, pool, catalog, gateway, assistant))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Catalog prices and product existence for the cart and checkout.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.inner.catalog.as_ref()
    }

    /// The payment gateway, when configured.
    #[must_use]
    pub fn gateway(&self) -> Option<&dyn PaymentGateway> {
        self.inner.gateway.as_deref()
    }

    /// The language-model assistant, when configured.
    #[must_use]
    pub fn assistant(&self) -> Option<&AssistantClient> {
        self.inner.assistant.as_ref()
    }

    /// Payment intents currently being completed.
    #[must_use]
    pub fn in_flight(&self) -> &InFlightCheckouts {
        &self.inner.in_flight
    }
}
