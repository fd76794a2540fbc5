//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use herbal_garden_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{PendingSubmission, RecentOrder};
use crate::services::csrf;
use crate::state::AppState;

/// Order row for display.
pub struct OrderView {
    pub id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub total: String,
    pub status: String,
    pub created_at: String,
}

impl OrderView {
    fn new(order: RecentOrder, currency: CurrencyCode) -> Self {
        Self {
            id: order.id.as_i32(),
            total: format_amount(order.total_amount, currency),
            status: order.status.to_string(),
            created_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
        }
    }
}

/// Pending submission for display.
pub struct SubmissionView {
    pub id: i32,
    pub plant_name: String,
    pub scientific_name: String,
    pub description: String,
    pub submitted_by: String,
    pub submitted_email: String,
    pub has_image: bool,
    pub created_at: String,
}

impl From<PendingSubmission> for SubmissionView {
    fn from(submission: PendingSubmission) -> Self {
        Self {
            id: submission.id.as_i32(),
            plant_name: submission.plant_name,
            scientific_name: submission.scientific_name.unwrap_or_default(),
            description: submission.description.unwrap_or_default(),
            submitted_by: submission
                .submitted_by
                .unwrap_or_else(|| "Anonymous".to_owned()),
            submitted_email: submission.submitted_email.unwrap_or_default(),
            has_image: submission.image_path.is_some(),
            created_at: submission.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub csrf_token: String,
    pub plant_count: i64,
    pub product_count: i64,
    pub order_count: i64,
    pub revenue: String,
    pub orders: Vec<OrderView>,
    pub submissions: Vec<SubmissionView>,
}

fn format_amount(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display()
}

/// Render the dashboard, minting the session's CSRF token if needed.
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let csrf_token = csrf::issue(&session).await?;

    let stats = state.dashboard().stats().await?;
    let orders = state.dashboard().recent_orders().await?;
    let submissions = state.submissions().pending().await?;

    let currency = state.config().currency;

    Ok(DashboardTemplate {
        admin_name: admin.username,
        csrf_token: csrf_token.as_str().to_owned(),
        plant_count: stats.plant_count,
        product_count: stats.product_count,
        order_count: stats.order_count,
        revenue: format_amount(stats.revenue, currency),
        orders: orders
            .into_iter()
            .map(|order| OrderView::new(order, currency))
            .collect(),
        submissions: submissions.into_iter().map(SubmissionView::from).collect(),
    })
}
