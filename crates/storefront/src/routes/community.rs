//! Community plant submissions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::SubmissionRepository;
use crate::error::{AppError, Result};
use crate::models::{CommunitySubmission, NewSubmission};
use crate::routes::assistant::bad_multipart;
use crate::services::analytics::{self, AnalyticsEvent};
use crate::services::uploads::{self, PendingImage};
use crate::state::AppState;

/// Submission display data for templates.
#[derive(Clone)]
pub struct SubmissionView {
    pub plant_name: String,
    pub scientific_name: String,
    pub description: String,
    pub submitted_by: String,
    pub status: String,
    pub submitted_on: String,
}

impl From<CommunitySubmission> for SubmissionView {
    fn from(s: CommunitySubmission) -> Self {
        Self {
            plant_name: s.plant_name,
            scientific_name: s.scientific_name.unwrap_or_default(),
            description: s.description.unwrap_or_default(),
            submitted_by: s
                .submitted_by
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            status: s.status.to_string(),
            submitted_on: s.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Community page template.
#[derive(Template, WebTemplate)]
#[template(path = "community/index.html")]
pub struct CommunityTemplate {
    pub submissions: Vec<SubmissionView>,
}

/// Display the most recent submissions.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let submissions = SubmissionRepository::new(state.pool())
        .list_recent()
        .await?
        .into_iter()
        .map(SubmissionView::from)
        .collect();

    Ok(CommunityTemplate { submissions })
}

/// Store a submission for moderation.
///
/// An attached image is kept only when its extension is accepted; other
/// files are ignored. The image is written after the form validates and is
/// removed again if the insert fails.
#[instrument(skip(state, multipart))]
pub async fn submit_plant(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let mut submission = NewSubmission::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            if !bytes.is_empty() && uploads::image_extension(&filename).is_some() {
                image = Some(PendingImage { filename, bytes });
            }
            continue;
        }

        let value = field.text().await.map_err(bad_multipart)?;
        let value = value.trim().to_string();
        let optional = (!value.is_empty()).then(|| value.clone());
        match name.as_str() {
            "plant_name" => submission.plant_name = value,
            "scientific_name" => submission.scientific_name = optional,
            "description" => submission.description = optional,
            "submitted_by" => submission.submitted_by = optional,
            "submitted_email" => submission.submitted_email = optional,
            _ => {}
        }
    }

    if submission.plant_name.is_empty() {
        return Err(AppError::BadRequest("Plant name is required".to_string()));
    }

    let plant_name = submission.plant_name.clone();
    let submissions = SubmissionRepository::new(state.pool());
    let id = uploads::save_with_image(&state.config().upload_dir, image, |path| async move {
        let submission = NewSubmission {
            image_path: path.map(|p| p.to_string_lossy().into_owned()),
            ..submission
        };
        submissions
            .create(&submission)
            .await
            .map_err(AppError::from)
    })
    .await?;
    tracing::info!(submission_id = %id, "Community submission received");

    analytics::record(
        state.pool(),
        AnalyticsEvent::CommunitySubmission { plant_name },
    );

    Ok(Json(json!({
        "success": true,
        "message": "Your submission has been received and is pending approval."
    })))
}
