//! Community plant submissions.

use chrono::{DateTime, Utc};
use herbal_garden_core::{SubmissionId, SubmissionStatus};
use serde::Serialize;
use sqlx::FromRow;

/// A stored submission.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommunitySubmission {
    pub id: SubmissionId,
    pub plant_name: String,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub submitted_by: Option<String>,
    pub submitted_email: Option<String>,
    pub image_path: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields collected from the submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubmission {
    pub plant_name: String,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub submitted_by: Option<String>,
    pub submitted_email: Option<String>,
    pub image_path: Option<String>,
}
