//! Session actor types
//!
//! The authenticated actor is an explicit value passed into every operation
//! that needs authorization. It never carries password material; absence of
//! a [`SessionUser`] means unauthenticated.

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The authenticated actor
///
/// `country` drives regional catalog visibility; it is `None` for admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Record id in `"users:key"` form
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub country: Option<String>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }

    #[test]
    fn test_session_user_has_no_password_field() {
        let user = SessionUser {
            id: "users:abc".into(),
            username: "fern".into(),
            email: "fern@example.com".into(),
            role: Role::User,
            country: Some("india".into()),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }
}
