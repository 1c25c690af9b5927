//! Wishlist Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::WishlistEntry;
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const LIKES_TABLE: &str = "likes";

#[derive(Clone)]
pub struct WishlistRepository {
    base: BaseRepository,
}

impl WishlistRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn id(id: &str) -> RecordId {
        record_id(LIKES_TABLE, id)
    }

    /// All entries for a user
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<WishlistEntry>> {
        let entries: Vec<WishlistEntry> = self
            .base
            .db()
            .query("SELECT * FROM likes WHERE user = $user")
            .bind(("user", record_id("users", user_id)))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// The unique entry for a (user, plant) pair, if any
    pub async fn find_entry(
        &self,
        user_id: &str,
        plant_id: &str,
    ) -> RepoResult<Option<WishlistEntry>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM likes WHERE user = $user AND plant = $plant LIMIT 1")
            .bind(("user", record_id("users", user_id)))
            .bind(("plant", record_id("plants", plant_id)))
            .await?;
        let entries: Vec<WishlistEntry> = result.take(0)?;
        Ok(entries.into_iter().next())
    }

    /// Insert an entry
    pub async fn create(&self, entry: WishlistEntry) -> RepoResult<WishlistEntry> {
        let created: Option<WishlistEntry> =
            self.base.db().create(LIKES_TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create wishlist entry".to_string()))
    }

    /// Delete an entry
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let _: Option<WishlistEntry> = self.base.db().delete(Self::id(id)).await?;
        Ok(())
    }

    /// Number of entries for a user
    pub async fn count_for_user(&self, user_id: &str) -> RepoResult<u64> {
        #[derive(Deserialize)]
        struct Count {
            count: u64,
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM likes WHERE user = $user GROUP ALL")
            .bind(("user", record_id("users", user_id)))
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.into_iter().next().map(|c| c.count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, plant: &str) -> WishlistEntry {
        WishlistEntry {
            id: None,
            user: record_id("users", user),
            plant: record_id("plants", plant),
            name: "Fern".into(),
            price: 100,
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_count_for_user() {
        let repo = WishlistRepository::new(crate::db::open_in_memory().await.unwrap());
        assert_eq!(repo.count_for_user("u1").await.unwrap(), 0);

        repo.create(entry("u1", "p1")).await.unwrap();
        repo.create(entry("u1", "p2")).await.unwrap();
        repo.create(entry("u2", "p1")).await.unwrap();

        assert_eq!(repo.count_for_user("u1").await.unwrap(), 2);
        assert_eq!(repo.count_for_user("u2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_and_delete_entry() {
        let repo = WishlistRepository::new(crate::db::open_in_memory().await.unwrap());
        let created = repo.create(entry("u1", "p1")).await.unwrap();

        let found = repo.find_entry("u1", "p1").await.unwrap();
        assert!(found.is_some());

        repo.delete(&created.id.unwrap().to_string()).await.unwrap();
        assert!(repo.find_entry("u1", "p1").await.unwrap().is_none());
    }
}
