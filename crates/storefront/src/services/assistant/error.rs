//! Error types for the language-model client.

use thiserror::Error;

/// Errors that can occur when calling the language-model provider.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key configured.
    #[error("assistant is not configured")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error object.
    #[error("API error ({error_type}): {message}")]
    Api { error_type: String, message: String },

    /// Rate limited by the provider.
    #[error("rate limited")]
    RateLimited,

    /// The provider answered without any text.
    #[error("empty response")]
    EmptyResponse,

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error envelope returned by the provider.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    pub message: String,
}
