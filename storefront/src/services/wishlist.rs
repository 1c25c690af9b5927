//! Wishlist Service

use serde_json::to_value;
use shared::{AppError, AppResult, ChangeAction, SessionUser};

use crate::core::Store;
use crate::db::models::WishlistEntry;
use crate::db::repository::{PlantRepository, WishlistRepository, record_id};

const RESOURCE_LIKES: &str = "likes";

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeStatus {
    Liked,
    Unliked,
}

#[derive(Clone)]
pub struct WishlistService {
    store: Store,
}

impl WishlistService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn repo(&self) -> WishlistRepository {
        WishlistRepository::new(self.store.db.clone())
    }

    /// Like a plant, or un-like it if it is already liked
    ///
    /// A new entry snapshots the plant's current name, price, and image.
    pub async fn toggle(&self, actor: &SessionUser, plant_id: &str) -> AppResult<LikeStatus> {
        let repo = self.repo();

        if let Some(existing) = repo.find_entry(&actor.id, plant_id).await? {
            let id = existing.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
            repo.delete(&id).await?;
            self.store
                .publish(RESOURCE_LIKES, ChangeAction::Deleted, id, None);
            return Ok(LikeStatus::Unliked);
        }

        let plant = PlantRepository::new(self.store.db.clone())
            .find_by_id(plant_id)
            .await?
            .ok_or_else(|| AppError::plant_not_found(plant_id))?;

        let entry = repo
            .create(WishlistEntry {
                id: None,
                user: record_id("users", &actor.id),
                plant: PlantRepository::id(plant_id),
                name: plant.name,
                price: plant.price,
                image: plant.image,
            })
            .await?;
        let id = entry.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        self.store
            .publish(RESOURCE_LIKES, ChangeAction::Created, id, to_value(&entry).ok());
        Ok(LikeStatus::Liked)
    }

    /// Whether the actor has liked a plant
    pub async fn is_liked(&self, actor: &SessionUser, plant_id: &str) -> AppResult<bool> {
        Ok(self.repo().find_entry(&actor.id, plant_id).await?.is_some())
    }

    /// Number of entries on the actor's wishlist
    pub async fn like_count(&self, actor: &SessionUser) -> AppResult<u64> {
        Ok(self.repo().count_for_user(&actor.id).await?)
    }

    /// The actor's wishlist
    pub async fn list(&self, actor: &SessionUser) -> AppResult<Vec<WishlistEntry>> {
        Ok(self.repo().find_by_user(&actor.id).await?)
    }
}
