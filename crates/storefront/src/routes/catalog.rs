//! Catalog pages: landing, garden, plant detail and shop.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use herbal_garden_core::{CurrencyCode, PlantId};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::THREE_JS_URL;
use crate::models::{Plant, ProductListing};
use crate::services::analytics::{self, AnalyticsEvent};
use crate::state::AppState;

/// Plant display data for templates.
#[derive(Clone)]
pub struct PlantView {
    pub id: i32,
    pub name: String,
    pub scientific_name: String,
    pub category: String,
    pub overview: String,
    pub medicinal_uses: String,
    pub cultivation: String,
    pub image_url: Option<String>,
    pub model_url: Option<String>,
}

impl From<Plant> for PlantView {
    fn from(plant: Plant) -> Self {
        Self {
            id: plant.id.as_i32(),
            name: plant.name,
            scientific_name: plant.scientific_name.unwrap_or_default(),
            category: plant.category.unwrap_or_default(),
            overview: plant.overview.unwrap_or_default(),
            medicinal_uses: plant.medicinal_uses.unwrap_or_default(),
            cultivation: plant.cultivation.unwrap_or_default(),
            image_url: plant.image_url,
            model_url: plant.model_url,
        }
    }
}

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub plant_name: Option<String>,
    pub in_stock: bool,
}

impl ProductView {
    #[must_use]
    pub fn from_listing(product: ProductListing, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.as_i32(),
            price: product.display_price(currency),
            name: product.name,
            description: product.description.unwrap_or_default(),
            image_url: product.image_url,
            plant_name: product.plant_name,
            in_stock: product.stock > 0,
        }
    }
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate;

/// Garden listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/garden.html")]
pub struct GardenTemplate {
    pub plants: Vec<PlantView>,
}

/// Plant detail template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/plant.html")]
pub struct PlantTemplate {
    pub plant: PlantView,
    pub three_js_url: &'static str,
}

/// Shop listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/shop.html")]
pub struct ShopTemplate {
    pub products: Vec<ProductView>,
}

/// Display the landing page.
pub async fn index() -> impl IntoResponse {
    IndexTemplate
}

/// Display every plant in the garden.
#[instrument(skip(state))]
pub async fn garden(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let plants = CatalogRepository::new(state.pool())
        .list_plants()
        .await?
        .into_iter()
        .map(PlantView::from)
        .collect();

    Ok(GardenTemplate { plants })
}

/// Display one plant and record the view.
#[instrument(skip(state))]
pub async fn plant_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let plant = CatalogRepository::new(state.pool())
        .get_plant(PlantId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plant {id}")))?;

    analytics::record(
        state.pool(),
        AnalyticsEvent::PlantView {
            plant_id: plant.id,
            plant_name: plant.name.clone(),
        },
    );

    Ok(PlantTemplate {
        plant: PlantView::from(plant),
        three_js_url: THREE_JS_URL,
    })
}

/// Display every product.
#[instrument(skip(state))]
pub async fn shop(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let currency = state.config().currency;
    let products = CatalogRepository::new(state.pool())
        .list_products()
        .await?
        .into_iter()
        .map(|p| ProductView::from_listing(p, currency))
        .collect();

    Ok(ShopTemplate { products })
}
