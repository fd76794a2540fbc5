//! Rows read by the admin console.

use chrono::{DateTime, NaiveDate, Utc};
use herbal_garden_core::{OrderId, OrderStatus, SubmissionId};
use rust_decimal::Decimal;
use serde::Serialize;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct DashboardStats {
    pub plant_count: i64,
    pub product_count: i64,
    pub order_count: i64,
    /// Sum of completed order totals.
    pub revenue: Decimal,
}

/// One of the most recent orders.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentOrder {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A community submission awaiting moderation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingSubmission {
    pub id: SubmissionId,
    pub plant_name: String,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub submitted_by: Option<String>,
    pub submitted_email: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Number of events recorded for one event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct EventStat {
    pub event_type: String,
    pub count: i64,
}

/// Number of events recorded on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub count: i64,
}

/// Payload of `GET /api/analytics`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub event_stats: Vec<EventStat>,
    pub daily_activity: Vec<DailyActivity>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_report_shape() {
        let report = AnalyticsReport {
            event_stats: vec![EventStat {
                event_type: "plant_view".to_owned(),
                count: 12,
            }],
            daily_activity: vec![DailyActivity {
                date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
                count: 5,
            }],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["event_stats"][0]["event_type"], "plant_view");
        assert_eq!(json["event_stats"][0]["count"], 12);
        assert_eq!(json["daily_activity"][0]["date"], "2026-03-14");
        assert_eq!(json["daily_activity"][0]["count"], 5);
    }
}
