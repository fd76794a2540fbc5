//! Stripe `PaymentIntents` client.
//!
//! Talks to the REST API directly with form-encoded requests; only the two
//! endpoints checkout needs are implemented.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use crate::config::StripeConfig;

use super::error::{ApiErrorResponse, PaymentError};
use super::{CreateIntent, CreatedIntent, IntentStatus, PaymentGateway, RetrievedIntent};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    secret_key: SecretString,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    status: IntentStatus,
    amount: i64,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(StripeClientInner {
                client,
                secret_key: config.secret_key.clone(),
                api_base: config.api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.inner.api_base)
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<PaymentIntentResponse, PaymentError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| PaymentError::Parse(format!("Failed to parse payment intent: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> PaymentError {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return PaymentError::Unauthorized;
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) if status == reqwest::StatusCode::NOT_FOUND => {
                    PaymentError::NotFound(api_error.error.message)
                }
                Ok(api_error) => PaymentError::Api {
                    error_type: api_error.error.error_type,
                    message: api_error.error.message,
                },
                Err(_) => PaymentError::Api {
                    error_type: format!("http_{}", status.as_u16()),
                    message: body,
                },
            },
            Err(e) => PaymentError::Http(e),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = request.currency.code()))]
    async fn create_intent(&self, request: CreateIntent) -> Result<CreatedIntent, PaymentError> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), request.amount.to_string()),
            (
                "currency".to_string(),
                request.currency.provider_code().to_string(),
            ),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        for (key, value) in request.metadata {
            form.push((format!("metadata[{key}]"), value));
        }

        let response = self
            .inner
            .client
            .post(self.url("payment_intents"))
            .bearer_auth(self.inner.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?;

        let intent = self.handle_response(response).await?;
        let client_secret = intent
            .client_secret
            .ok_or_else(|| PaymentError::Parse("payment intent has no client_secret".to_string()))?;

        tracing::info!(payment_intent_id = %intent.id, "Created payment intent");

        Ok(CreatedIntent {
            id: intent.id,
            client_secret,
        })
    }

    #[instrument(skip(self), fields(payment_intent_id = %id))]
    async fn retrieve_intent(&self, id: &str) -> Result<RetrievedIntent, PaymentError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("payment_intents/{id}")))
            .bearer_auth(self.inner.secret_key.expose_secret())
            .send()
            .await?;

        let intent = self.handle_response(response).await?;

        Ok(RetrievedIntent {
            id: intent.id,
            status: intent.status,
            amount: intent.amount,
            metadata: intent.metadata,
        })
    }
}
