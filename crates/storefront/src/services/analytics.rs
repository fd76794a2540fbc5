//! Fire-and-forget usage analytics.
//!
//! Recording never blocks or fails the request that triggered it: the insert
//! runs on a spawned task and errors are logged at warn level.

use herbal_garden_core::{OrderId, PlantId};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;

use crate::db::AnalyticsRepository;

/// Longest chatbot query prefix stored with an event.
const MAX_QUERY_CHARS: usize = 100;

/// A usage event.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    PlantView { plant_id: PlantId, plant_name: String },
    OrderCompleted { order_id: OrderId, amount: Decimal, items_count: usize },
    ChatbotQuery { query: String },
    PlantRecognition { filename: String },
    CommunitySubmission { plant_name: String },
}

impl AnalyticsEvent {
    /// Build a chatbot event, keeping only the start of the query.
    #[must_use]
    pub fn chatbot_query(message: &str) -> Self {
        Self::ChatbotQuery {
            query: message.chars().take(MAX_QUERY_CHARS).collect(),
        }
    }

    /// Value stored in `analytics.event_type`.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::PlantView { .. } => "plant_view",
            Self::OrderCompleted { .. } => "order_completed",
            Self::ChatbotQuery { .. } => "chatbot_query",
            Self::PlantRecognition { .. } => "plant_recognition",
            Self::CommunitySubmission { .. } => "community_submission",
        }
    }

    /// Value stored in `analytics.event_data`.
    #[must_use]
    pub fn data(&self) -> Value {
        match self {
            Self::PlantView {
                plant_id,
                plant_name,
            } => json!({ "plant_id": plant_id, "plant_name": plant_name }),
            Self::OrderCompleted {
                order_id,
                amount,
                items_count,
            } => json!({ "order_id": order_id, "amount": amount, "items_count": items_count }),
            Self::ChatbotQuery { query } => json!({ "query": query }),
            Self::PlantRecognition { filename } => json!({ "filename": filename }),
            Self::CommunitySubmission { plant_name } => json!({ "plant_name": plant_name }),
        }
    }
}

/// Record an event in the background.
pub fn record(pool: &PgPool, event: AnalyticsEvent) {
    let pool = pool.clone();
    tokio::spawn(async move {
        let event_type = event.event_type();
        if let Err(e) = AnalyticsRepository::new(&pool)
            .record(event_type, &event.data())
            .await
        {
            tracing::warn!(error = %e, event_type, "Failed to record analytics event");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatbot_query_is_truncated_by_chars() {
        let long = "तुलसी".repeat(60);
        let AnalyticsEvent::ChatbotQuery { query } = AnalyticsEvent::chatbot_query(&long) else {
            panic!("wrong variant");
        };
        assert_eq!(query.chars().count(), MAX_QUERY_CHARS);
    }

    #[test]
    fn test_event_payloads() {
        let event = AnalyticsEvent::OrderCompleted {
            order_id: OrderId::new(7),
            amount: "15.00".parse().expect("decimal"),
            items_count: 2,
        };
        assert_eq!(event.event_type(), "order_completed");
        assert_eq!(
            event.data(),
            json!({ "order_id": 7, "amount": "15.00", "items_count": 2 })
        );

        let event = AnalyticsEvent::PlantView {
            plant_id: PlantId::new(3),
            plant_name: "Neem".to_string(),
        };
        assert_eq!(event.event_type(), "plant_view");
        assert_eq!(event.data()["plant_name"], "Neem");
    }
}
