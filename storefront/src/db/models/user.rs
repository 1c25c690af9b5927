//! User Model

use serde::{Deserialize, Serialize};
use shared::{Role, SessionUser};
use surrealdb::RecordId;

pub type UserId = RecordId;

/// User account
///
/// `password_hash` is an argon2 PHC string; it never leaves the db layer.
/// Callers get a [`SessionUser`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<UserId>,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    /// `None` for admins
    pub country: Option<String>,
    pub role: Role,
    pub created_at: String,
}

impl User {
    /// Sanitized session view of this account
    pub fn session(&self) -> SessionUser {
        SessionUser {
            id: self.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            country: self.country.clone(),
        }
    }
}
