//! Catalog Service
//!
//! Read surface for browsing plus admin-only catalog mutations. Stock
//! counters are never edited here; they belong to the reservation engine.

use serde_json::to_value;
use shared::{AppResult, ChangeAction, SessionUser};

use super::ensure_admin;
use crate::core::Store;
use crate::db::models::{Plant, PlantCreate, PlantUpdate};
use crate::db::repository::{PlantRepository, record_id};
use crate::inventory::engine::RESOURCE_PLANTS;

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn repo(&self) -> PlantRepository {
        PlantRepository::new(self.store.db.clone())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn list(&self) -> AppResult<Vec<Plant>> {
        Ok(self.repo().find_all().await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Plant>> {
        Ok(self.repo().find_by_id(id).await?)
    }

    /// Plants visible in a country (lowercased key equality)
    pub async fn list_by_country(&self, country: &str) -> AppResult<Vec<Plant>> {
        Ok(self.repo().find_by_country(country).await?)
    }

    /// Plants owned by an admin
    pub async fn list_by_admin(&self, admin_id: &str) -> AppResult<Vec<Plant>> {
        Ok(self.repo().find_by_admin(admin_id).await?)
    }

    /// Case-insensitive substring search on name or country
    pub async fn search(&self, query: &str) -> AppResult<Vec<Plant>> {
        Ok(self.repo().search(query).await?)
    }

    /// Plants at or below the threshold; defaults to the configured one
    pub async fn low_stock(&self, threshold: Option<i64>) -> AppResult<Vec<Plant>> {
        let threshold = threshold.unwrap_or(self.store.config.low_stock_threshold);
        Ok(self.repo().find_low_stock(threshold).await?)
    }

    pub async fn out_of_stock(&self) -> AppResult<Vec<Plant>> {
        Ok(self.repo().find_out_of_stock().await?)
    }

    // =========================================================================
    // Admin mutations
    // =========================================================================

    /// Create a plant owned by the acting admin
    pub async fn create(&self, actor: &SessionUser, data: PlantCreate) -> AppResult<Plant> {
        ensure_admin(actor)?;
        let created_by = Some(record_id("users", &actor.id));
        let plant = self.repo().create(data, created_by).await?;
        let id = plant.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        self.store
            .publish(RESOURCE_PLANTS, ChangeAction::Created, id, to_value(&plant).ok());
        Ok(plant)
    }

    /// Partial update of catalog fields
    pub async fn update(
        &self,
        actor: &SessionUser,
        id: &str,
        data: PlantUpdate,
    ) -> AppResult<Plant> {
        ensure_admin(actor)?;
        let plant = self.repo().update(id, data).await?;
        let id = plant.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        self.store
            .publish(RESOURCE_PLANTS, ChangeAction::Updated, id, to_value(&plant).ok());
        Ok(plant)
    }

    /// Unconditional hard delete
    ///
    /// Historical order items keep their own snapshots, so order history
    /// stays readable after the plant is gone.
    pub async fn delete(&self, actor: &SessionUser, id: &str) -> AppResult<()> {
        ensure_admin(actor)?;
        self.repo().delete(id).await?;
        self.store.publish(
            RESOURCE_PLANTS,
            ChangeAction::Deleted,
            PlantRepository::id(id).to_string(),
            None,
        );
        Ok(())
    }
}
