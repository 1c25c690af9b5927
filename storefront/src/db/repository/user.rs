//! User Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::User;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const USER_TABLE: &str = "users";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn id(id: &str) -> RecordId {
        record_id(USER_TABLE, id)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(Self::id(id)).await?;
        Ok(user)
    }

    /// Find user by email (unique)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM users WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new account
    ///
    /// The email uniqueness pre-check in the identity service is backed by
    /// the unique index on `users.email`, which turns a racing duplicate
    /// insert into a database error here.
    pub async fn create(&self, user: User) -> RepoResult<User> {
        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;

    fn account(email: &str) -> User {
        User {
            id: None,
            email: email.into(),
            username: "fern".into(),
            password_hash: "hash".into(),
            country: Some("india".into()),
            role: Role::User,
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repo = UserRepository::new(crate::db::open_in_memory().await.unwrap());
        repo.create(account("a@example.com")).await.unwrap();

        let found = repo.find_by_email("a@example.com").await.unwrap();
        assert!(found.is_some());
        assert!(repo.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_index() {
        let repo = UserRepository::new(crate::db::open_in_memory().await.unwrap());
        repo.create(account("a@example.com")).await.unwrap();
        assert!(repo.create(account("a@example.com")).await.is_err());
    }
}
