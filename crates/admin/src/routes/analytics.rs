//! Analytics report.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::AnalyticsRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::AnalyticsReport;
use crate::state::AppState;

/// Event counts by type and by day.
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn report(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>> {
    let report = AnalyticsRepository::new(state.pool()).report().await?;
    Ok(Json(report))
}
