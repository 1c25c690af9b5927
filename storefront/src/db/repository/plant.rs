//! Plant Repository
//!
//! Catalog CRUD plus the conditional stock-counter writes every reservation
//! operation runs on. The counter updates are single statements guarded by
//! `WHERE quantity >= $qty`, so an interleaved operation on the same plant
//! cannot oversell even outside the engine's per-plant lock.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{PLACEHOLDER_IMAGE, Plant, PlantCreate, PlantUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const PLANT_TABLE: &str = "plants";

#[derive(Clone)]
pub struct PlantRepository {
    base: BaseRepository,
}

impl PlantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn id(id: &str) -> RecordId {
        record_id(PLANT_TABLE, id)
    }

    /// Find all plants
    pub async fn find_all(&self) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plants ORDER BY name")
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Find plant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Plant>> {
        let plant: Option<Plant> = self.base.db().select(Self::id(id)).await?;
        Ok(plant)
    }

    /// Find plants visible in a country (equality on the lowercased key)
    pub async fn find_by_country(&self, country: &str) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plants WHERE country = $country ORDER BY name")
            .bind(("country", country.to_lowercase()))
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Find plants created by an admin
    pub async fn find_by_admin(&self, admin_id: &str) -> RepoResult<Vec<Plant>> {
        let admin = record_id("users", admin_id);
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plants WHERE created_by = $admin ORDER BY name")
            .bind(("admin", admin))
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Case-insensitive substring search on name or country
    pub async fn search(&self, query: &str) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query(
                "SELECT * FROM plants \
                 WHERE string::contains(string::lowercase(name), $q) \
                    OR string::contains(string::lowercase(country), $q) \
                 ORDER BY name",
            )
            .bind(("q", query.to_lowercase()))
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Plants at or below the stock threshold
    pub async fn find_low_stock(&self, threshold: i64) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plants WHERE quantity <= $threshold ORDER BY quantity")
            .bind(("threshold", threshold))
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Plants with no available stock
    pub async fn find_out_of_stock(&self) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plants WHERE quantity = 0")
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Create a new plant
    ///
    /// Stock and discount default to 0, the image to a placeholder, and
    /// `original_quantity` starts equal to `quantity`.
    pub async fn create(
        &self,
        data: PlantCreate,
        created_by: Option<RecordId>,
    ) -> RepoResult<Plant> {
        let quantity = data.quantity.unwrap_or(0);
        let plant = Plant {
            id: None,
            name: data.name,
            image: data
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            price: data.price,
            discount: data.discount.unwrap_or(0),
            country: data.country.to_lowercase(),
            on_sale: data.on_sale.unwrap_or(false),
            quantity,
            selling_quantity: 0,
            original_quantity: Some(quantity),
            created_by,
        };

        let created: Option<Plant> = self.base.db().create(PLANT_TABLE).content(plant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create plant".to_string()))
    }

    /// Partial-merge update
    pub async fn update(&self, id: &str, mut data: PlantUpdate) -> RepoResult<Plant> {
        if let Some(country) = data.country.take() {
            data.country = Some(country.to_lowercase());
        }
        let updated: Option<Plant> = self.base.db().update(Self::id(id)).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Plant {} not found", id)))
    }

    /// Hard delete
    ///
    /// Unconditional: historical order items keep their own name/price
    /// snapshots, so order history survives the deletion.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let deleted: Option<Plant> = self.base.db().delete(Self::id(id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Plant {} not found", id)));
        }
        Ok(())
    }

    /// Move `qty` units from available to reserved, refusing to oversell
    ///
    /// Back-fills `original_quantity` from the pre-update counters on rows
    /// that predate it. Returns `None` when the plant is missing or has
    /// fewer than `qty` units available; in either case nothing changed.
    pub async fn reserve(&self, id: &str, qty: i64) -> RepoResult<Option<Plant>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET \
                     original_quantity = original_quantity ?? (quantity + selling_quantity), \
                     quantity = quantity - $qty, \
                     selling_quantity = selling_quantity + $qty \
                 WHERE quantity >= $qty \
                 RETURN AFTER",
            )
            .bind(("id", Self::id(id)))
            .bind(("qty", qty))
            .await?;
        let plants: Vec<Plant> = result.take(0)?;
        Ok(plants.into_iter().next())
    }

    /// Return `qty` units from reserved to available
    ///
    /// `selling_quantity` is clamped at 0. Returns `None` when the plant no
    /// longer exists (it may have been deleted while referenced).
    pub async fn release(&self, id: &str, qty: i64) -> RepoResult<Option<Plant>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET \
                     quantity = quantity + $qty, \
                     selling_quantity = math::max([selling_quantity - $qty, 0]) \
                 RETURN AFTER",
            )
            .bind(("id", Self::id(id)))
            .bind(("qty", qty))
            .await?;
        let plants: Vec<Plant> = result.take(0)?;
        Ok(plants.into_iter().next())
    }
}
