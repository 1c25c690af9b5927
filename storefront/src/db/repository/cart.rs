//! Cart Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::CartItem;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn id(id: &str) -> RecordId {
        record_id(CART_TABLE, id)
    }

    /// All cart lines for a user
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user")
            .bind(("user", record_id("users", user_id)))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// The unique line for a (user, plant) pair, if any
    pub async fn find_line(&self, user_id: &str, plant_id: &str) -> RepoResult<Option<CartItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user AND plant = $plant LIMIT 1")
            .bind(("user", record_id("users", user_id)))
            .bind(("plant", record_id("plants", plant_id)))
            .await?;
        let items: Vec<CartItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Get a cart line by id
    pub async fn get(&self, id: &str) -> RepoResult<Option<CartItem>> {
        let item: Option<CartItem> = self.base.db().select(Self::id(id)).await?;
        Ok(item)
    }

    /// Create a new cart line
    pub async fn create(&self, item: CartItem) -> RepoResult<CartItem> {
        let created: Option<CartItem> = self.base.db().create(CART_TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart item".to_string()))
    }

    /// Set a line's quantity
    pub async fn set_qty(&self, id: &str, qty: i64) -> RepoResult<CartItem> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET qty = $qty RETURN AFTER")
            .bind(("id", Self::id(id)))
            .bind(("qty", qty))
            .await?;
        let items: Vec<CartItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart item {} not found", id)))
    }

    /// Delete a line
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let _: Option<CartItem> = self.base.db().delete(Self::id(id)).await?;
        Ok(())
    }

    /// Delete every line for a user, returning how many were removed
    pub async fn clear_user(&self, user_id: &str) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("DELETE cart WHERE user = $user RETURN BEFORE")
            .bind(("user", record_id("users", user_id)))
            .await?;
        let deleted: Vec<CartItem> = result.take(0)?;
        Ok(deleted.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(user: &str, plant: &str, qty: i64) -> CartItem {
        CartItem {
            id: None,
            user: record_id("users", user),
            plant: record_id("plants", plant),
            name: "Fern".into(),
            price: 100,
            original_price: 100,
            discount: 0,
            qty,
        }
    }

    async fn repo() -> CartRepository {
        CartRepository::new(crate::db::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_find_line_by_pair() {
        let repo = repo().await;
        repo.create(line("u1", "p1", 1)).await.unwrap();
        repo.create(line("u1", "p2", 2)).await.unwrap();
        repo.create(line("u2", "p1", 3)).await.unwrap();

        let found = repo.find_line("u1", "p2").await.unwrap().unwrap();
        assert_eq!(found.qty, 2);
        assert!(repo.find_line("u2", "p2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_user_only_touches_that_user() {
        let repo = repo().await;
        repo.create(line("u1", "p1", 1)).await.unwrap();
        repo.create(line("u1", "p2", 1)).await.unwrap();
        repo.create(line("u2", "p1", 1)).await.unwrap();

        assert_eq!(repo.clear_user("u1").await.unwrap(), 2);
        assert!(repo.find_by_user("u1").await.unwrap().is_empty());
        assert_eq!(repo.find_by_user("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_qty() {
        let repo = repo().await;
        let created = repo.create(line("u1", "p1", 1)).await.unwrap();
        let id = created.id.unwrap().to_string();
        let updated = repo.set_qty(&id, 4).await.unwrap();
        assert_eq!(updated.qty, 4);
    }
}
