//! Chat-completions client.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AssistantConfig;

use super::error::{ApiErrorResponse, AssistantError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CHAT_MAX_TOKENS: u32 = 500;
const CHAT_TEMPERATURE: f32 = 0.7;
const VISION_MAX_TOKENS: u32 = 300;

const CHAT_SYSTEM_PROMPT: &str = "You are an expert in Ayurveda and AYUSH medicinal plants. \
    Give helpful, accurate information about medicinal plants, their uses and benefits, \
    and traditional Ayurvedic practice. Be friendly and educational.";

const VISION_PROMPT: &str = "Identify this medicinal plant. If it is used in Ayurveda or \
    traditional medicine, give its common name, scientific name and key medicinal uses. \
    If you are not certain, make your best guess among common medicinal plants.";

/// Language-model client.
#[derive(Clone)]
pub struct AssistantClient {
    inner: Arc<AssistantClientInner>,
}

struct AssistantClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    api_base: String,
    chat_model: String,
    vision_model: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Content,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AssistantClient {
    /// Create a new assistant client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AssistantClientInner {
                client,
                api_key: config.api_key.clone(),
                api_base: config.api_base.trim_end_matches('/').to_string(),
                chat_model: config.chat_model.clone(),
                vision_model: config.vision_model.clone(),
            }),
        })
    }

    /// Answer a visitor's question about medicinal plants.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider returns no text.
    #[instrument(skip(self, message), fields(model = %self.inner.chat_model))]
    pub async fn chat(&self, message: &str) -> Result<String, AssistantError> {
        let request = CompletionRequest {
            model: &self.inner.chat_model,
            messages: vec![
                Message {
                    role: "system",
                    content: Content::Text(CHAT_SYSTEM_PROMPT.to_string()),
                },
                Message {
                    role: "user",
                    content: Content::Text(message.to_string()),
                },
            ],
            max_tokens: CHAT_MAX_TOKENS,
            temperature: Some(CHAT_TEMPERATURE),
        };

        self.complete(&request).await
    }

    /// Identify the plant in an image.
    ///
    /// The image is sent inline as a base64 data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider returns no text.
    #[instrument(skip(self, image), fields(model = %self.inner.vision_model, size = image.len()))]
    pub async fn identify_plant(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, AssistantError> {
        let data_url = format!("data:{mime_type};base64,{}", STANDARD.encode(image));

        let request = CompletionRequest {
            model: &self.inner.vision_model,
            messages: vec![Message {
                role: "user",
                content: Content::Parts(vec![
                    ContentPart::Text {
                        text: VISION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            }],
            max_tokens: VISION_MAX_TOKENS,
            temperature: None,
        };

        self.complete(&request).await
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, AssistantError> {
        let response = self
            .inner
            .client
            .post(format!("{}/v1/chat/completions", self.inner.api_base))
            .bearer_auth(self.inner.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AssistantError::Parse(format!("Failed to parse response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AssistantError::EmptyResponse)
    }

    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AssistantError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return AssistantError::RateLimited;
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => AssistantError::Api {
                    error_type: api_error
                        .error
                        .error_type
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: api_error.error.message,
                },
                Err(_) => AssistantError::Api {
                    error_type: format!("http_{}", status.as_u16()),
                    message: body,
                },
            },
            Err(e) => AssistantError::Http(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> AssistantClient {
        AssistantClient::new(&AssistantConfig {
            api_key: SecretString::from("sk-proj-Zq8vN3rT6yW1bE4hK7mP0sX5"),
            api_base: server.uri(),
            chat_model: "gpt-4o-mini".to_string(),
            vision_model: "gpt-4o".to_string(),
        })
        .unwrap()
    }

    fn reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        }))
    }

    #[tokio::test]
    async fn test_chat_sends_system_prompt_and_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "model": "gpt-4o-mini", "max_tokens": 500 })))
            .and(body_string_contains("Ayurveda"))
            .respond_with(reply("Tulsi supports immunity."))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server).chat("What is tulsi for?").await.unwrap();
        assert_eq!(answer, "Tulsi supports immunity.");
    }

    #[tokio::test]
    async fn test_identify_plant_sends_data_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "model": "gpt-4o" })))
            .and(body_string_contains("data:image/png;base64,aW1n"))
            .respond_with(reply("Neem (Azadirachta indica)"))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server)
            .identify_plant(b"img", "image/png")
            .await
            .unwrap();
        assert_eq!(answer, "Neem (Azadirachta indica)");
    }

    #[tokio::test]
    async fn test_api_error_and_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "type": "invalid_request_error", "message": "bad image" }
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.chat("hi").await.unwrap_err();
        assert!(matches!(err, AssistantError::Api { ref message, .. } if message == "bad image"));

        let err = client.chat("hi").await.unwrap_err();
        assert!(matches!(err, AssistantError::EmptyResponse));
    }
}
