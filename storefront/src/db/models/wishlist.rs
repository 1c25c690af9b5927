//! Wishlist Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A liked plant
///
/// Carries a denormalized snapshot so the wishlist renders without joining
/// the catalog; one entry per (user, plant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: Option<RecordId>,
    pub user: RecordId,
    pub plant: RecordId,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub image: String,
}
