//! Community submission moderation.
//!
//! Both actions need admin credentials and the session's CSRF token. The
//! credential check happens in the extractor, before the body is read.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};
use herbal_garden_core::{ModerationDecision, SubmissionId};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::auth::AdminIdentity;
use crate::services::csrf;
use crate::state::AppState;

/// Move a pending submission to `approved`.
pub async fn approve(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SubmissionId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    moderate(
        &state,
        &admin,
        &session,
        id,
        &headers,
        &body,
        ModerationDecision::Approve,
    )
    .await
}

/// Move a pending submission to `rejected`.
pub async fn reject(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SubmissionId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    moderate(
        &state,
        &admin,
        &session,
        id,
        &headers,
        &body,
        ModerationDecision::Reject,
    )
    .await
}

#[instrument(
    skip_all,
    fields(admin = %admin.username, submission_id = %id, ?decision)
)]
async fn moderate(
    state: &AppState,
    admin: &AdminIdentity,
    session: &Session,
    id: SubmissionId,
    headers: &HeaderMap,
    body: &[u8],
    decision: ModerationDecision,
) -> Result<Json<Value>> {
    let presented = csrf::presented_token(headers, body);
    csrf::verify(session, presented.as_deref()).await?;

    let status = state
        .submissions()
        .moderate(id, decision)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("submission {id}")),
            RepositoryError::Conflict(message) => AppError::Conflict(message),
            other => AppError::Database(other),
        })?;

    tracing::info!(%status, "Submission moderated");
    Ok(Json(json!({ "success": true, "status": status })))
}
