//! Catalog rows.

use chrono::{DateTime, Utc};
use herbal_garden_core::{CurrencyCode, PlantId, Price, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A medicinal plant in the garden.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    pub scientific_name: Option<String>,
    pub category: Option<String>,
    pub overview: Option<String>,
    pub medicinal_uses: Option<String>,
    pub cultivation: Option<String>,
    pub image_url: Option<String>,
    pub model_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product joined with the name of the plant it is made from.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub plant_id: Option<PlantId>,
    pub stock: i32,
    pub plant_name: Option<String>,
}

impl ProductListing {
    /// Price formatted for display.
    #[must_use]
    pub fn display_price(&self, currency: CurrencyCode) -> String {
        Price::new(self.price, currency).display()
    }
}
