//! Catalog repository: plants and products.

use std::collections::HashMap;

use async_trait::async_trait;
use herbal_garden_core::{PlantId, ProductId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{CatalogStore, RepositoryError};
use crate::models::{Plant, ProductListing};

/// Repository for catalog reads.
///
/// Owns a handle to the pool so it can live in application state.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    #[must_use]
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// All plants ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_plants(&self) -> Result<Vec<Plant>, RepositoryError> {
        let plants = sqlx::query_as::<_, Plant>(
            r"
            SELECT id, name, scientific_name, category, overview, medicinal_uses,
                   cultivation, image_url, model_url, created_at
            FROM plants
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plants)
    }

    /// A single plant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_plant(&self, id: PlantId) -> Result<Option<Plant>, RepositoryError> {
        let plant = sqlx::query_as::<_, Plant>(
            r"
            SELECT id, name, scientific_name, category, overview, medicinal_uses,
                   cultivation, image_url, model_url, created_at
            FROM plants
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plant)
    }

    /// All products with their plant name, ordered by product name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<ProductListing>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductListing>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.image_url, p.plant_id, p.stock,
                   pl.name AS plant_name
            FROM products p
            LEFT JOIN plants pl ON pl.id = p.plant_id
            ORDER BY p.name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Products with the given ids, keyed by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_id(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductListing>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductListing>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.image_url, p.plant_id, p.stock,
                   pl.name AS plant_name
            FROM products p
            LEFT JOIN plants pl ON pl.id = p.plant_id
            WHERE p.id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn prices_for(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Decimal>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (ProductId, Decimal)>(
            "SELECT id, price FROM products WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
