//! Herbal assistant: chatbot and plant recognition.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::analytics::{self, AnalyticsEvent};
use crate::services::assistant::{CHAT_NOT_CONFIGURED, RECOGNITION_NOT_CONFIGURED};
use crate::services::uploads::{self, UploadError};
use crate::state::AppState;

const CHAT_FAILED: &str =
    "Sorry, I couldn't reach the herbal assistant just now. Please try again in a moment.";

/// Chat page template.
#[derive(Template, WebTemplate)]
#[template(path = "assistant/chatbot.html")]
pub struct ChatbotTemplate;

/// Recognition page template.
#[derive(Template, WebTemplate)]
#[template(path = "assistant/recognize.html")]
pub struct RecognizeTemplate;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Display the chat page.
pub async fn chatbot_page() -> impl IntoResponse {
    ChatbotTemplate
}

/// Display the recognition page.
pub async fn recognize_page() -> impl IntoResponse {
    RecognizeTemplate
}

/// Ask the assistant a question.
///
/// Always answers with `{response}`; configuration and provider failures are
/// explained in the reply text.
#[instrument(skip(state, request))]
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<Value> {
    let Some(assistant) = state.assistant() else {
        return Json(json!({ "response": CHAT_NOT_CONFIGURED }));
    };

    match assistant.chat(&request.message).await {
        Ok(reply) => {
            analytics::record(
                state.pool(),
                AnalyticsEvent::chatbot_query(&request.message),
            );
            Json(json!({ "response": reply }))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Assistant chat failed");
            Json(json!({ "response": CHAT_FAILED }))
        }
    }
}

/// Identify the plant in an uploaded image.
#[instrument(skip(state, multipart))]
pub async fn recognize_plant(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = upload.ok_or(UploadError::Missing)?;
    if filename.is_empty() {
        return Err(AppError::BadRequest("No image selected".to_string()));
    }
    let extension = uploads::image_extension(&filename).ok_or(UploadError::InvalidType)?;

    let assistant = state
        .assistant()
        .ok_or_else(|| AppError::BadRequest(RECOGNITION_NOT_CONFIGURED.to_string()))?;

    let result = assistant
        .identify_plant(&bytes, uploads::mime_for_extension(&extension))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Plant recognition failed");
            AppError::BadRequest("Recognition failed. Please try another photo.".to_string())
        })?;

    analytics::record(
        state.pool(),
        AnalyticsEvent::PlantRecognition {
            filename: uploads::sanitize_filename(&filename),
        },
    );

    Ok(Json(json!({ "result": result })))
}

pub(crate) fn bad_multipart(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}
