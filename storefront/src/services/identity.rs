//! Identity Service
//!
//! Signup and login over the local user table. Passwords are stored as
//! argon2 hashes; the session value handed back to callers never carries
//! password material.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult, ChangeAction, Role, SessionUser};
use validator::Validate;

use crate::core::Store;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::time::now_rfc3339;

const RESOURCE_USERS: &str = "users";

/// Signup request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupPayload {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub country: Option<String>,
    pub role: Role,
}

#[derive(Clone)]
pub struct IdentityService {
    store: Store,
}

impl IdentityService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn repo(&self) -> UserRepository {
        UserRepository::new(self.store.db.clone())
    }

    /// Register a new account, returning its id
    ///
    /// Admins carry no country; their catalog view is global.
    pub async fn signup(&self, payload: SignupPayload) -> AppResult<String> {
        payload
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let repo = self.repo();
        if repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::duplicate_email(payload.email));
        }

        let password_hash = hash_password(&payload.password)?;
        let country = match payload.role {
            Role::Admin => None,
            Role::User => payload.country.map(|c| c.to_lowercase()),
        };

        let user = repo
            .create(User {
                id: None,
                email: payload.email,
                username: payload.username,
                password_hash,
                country,
                role: payload.role,
                created_at: now_rfc3339(),
            })
            .await?;

        let id = user.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        // Session-shaped snapshot only: no hash on the bus
        self.store.publish(
            RESOURCE_USERS,
            ChangeAction::Created,
            id.clone(),
            serde_json::to_value(user.session()).ok(),
        );
        Ok(id)
    }

    /// Authenticate by email and password
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionUser> {
        let user = self
            .repo()
            .find_by_email(email)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::invalid_credentials());
        }

        tracing::debug!(user = %user.email, "login ok");
        Ok(user.session())
    }

    /// Resolve a user id to its session view (stale-session refresh)
    pub async fn session_for(&self, user_id: &str) -> AppResult<SessionUser> {
        let user = self
            .repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {}", user_id)))?;
        Ok(user.session())
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
