//! Error types for the payment gateway client.

use thiserror::Error;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with an error object.
    #[error("payment provider error ({error_type}): {message}")]
    Api {
        /// Error type reported by the provider.
        error_type: String,
        /// Human-readable message from the provider.
        message: String,
    },

    /// Authentication with the gateway failed.
    #[error("payment provider rejected the API key")]
    Unauthorized,

    /// The intent does not exist at the gateway.
    #[error("payment intent not found: {0}")]
    NotFound(String),

    /// The response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl PaymentError {
    /// Message safe to show to the shopper.
    ///
    /// Provider messages are written for end users; transport and parse
    /// failures are not.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::NotFound(_) => "Payment not found".to_string(),
            Self::Http(_) | Self::Unauthorized | Self::Parse(_) => {
                "Payment provider is unavailable".to_string()
            }
        }
    }
}

/// Error envelope returned by the gateway.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "type": "card_error",
                "message": "Your card was declined."
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.error_type, "card_error");
        assert_eq!(response.error.message, "Your card was declined.");
    }

    #[test]
    fn test_public_message_hides_transport_details() {
        let err = PaymentError::Parse("expected value at line 1".to_string());
        assert_eq!(err.public_message(), "Payment provider is unavailable");

        let err = PaymentError::Api {
            error_type: "invalid_request_error".to_string(),
            message: "Amount must be at least $0.50 usd".to_string(),
        };
        assert_eq!(err.public_message(), "Amount must be at least $0.50 usd");
    }
}
