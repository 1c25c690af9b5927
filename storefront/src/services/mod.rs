//! Services
//!
//! Thin call-site wrappers over the repositories and the reservation
//! engine. Each service takes the acting [`SessionUser`] explicitly where
//! authorization matters; there is no ambient session singleton.
//!
//! [`SessionUser`]: shared::SessionUser

pub mod cart;
pub mod catalog;
pub mod identity;
pub mod orders;
pub mod reporting;
pub mod wishlist;

// Re-exports
pub use cart::CartService;
pub use catalog::CatalogService;
pub use identity::{IdentityService, SignupPayload};
pub use orders::{OrderEditor, OrderService};
pub use reporting::{ReportingService, SalesReportRow};
pub use wishlist::{LikeStatus, WishlistService};

use shared::{AppError, AppResult, SessionUser};

/// Reject non-admin actors
pub(crate) fn ensure_admin(actor: &SessionUser) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::admin_required())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ErrorCode, Role};

    fn actor(role: Role) -> SessionUser {
        SessionUser {
            id: "users:u1".into(),
            username: "fern".into(),
            email: "fern@example.com".into(),
            role,
            country: None,
        }
    }

    #[test]
    fn test_ensure_admin() {
        assert!(ensure_admin(&actor(Role::Admin)).is_ok());
        let err = ensure_admin(&actor(Role::User)).unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
    }
}
