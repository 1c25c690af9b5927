//! Plant Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type PlantId = RecordId;

/// Image used when an admin creates a plant without uploading one
pub const PLACEHOLDER_IMAGE: &str = "/images/plant-placeholder.png";

/// Plant catalog entry
///
/// Stock counters:
/// - `quantity`: units currently available to sell
/// - `selling_quantity`: units currently reserved or sold
/// - `original_quantity`: units ever stocked; `None` on rows created before
///   the counter existed, back-filled on first reservation
///
/// Invariant once `original_quantity` is set:
/// `quantity + selling_quantity == original_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: Option<PlantId>,
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Base price in minor units, pre-discount
    pub price: i64,
    /// Discount in percentage (e.g., 10 = 10%)
    #[serde(default)]
    pub discount: i32,
    /// Lowercase country key for regional visibility
    pub country: String,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub selling_quantity: i64,
    pub original_quantity: Option<i64>,
    /// Owning admin, if created through the admin flow
    pub created_by: Option<RecordId>,
}

impl Plant {
    /// Effective unit price: discounted when on sale, base price otherwise
    pub fn sale_price(&self) -> i64 {
        if self.on_sale && self.discount > 0 {
            // round-half-up on the discounted amount
            (self.price * (100 - self.discount as i64) + 50) / 100
        } else {
            self.price
        }
    }

    /// Baseline for reporting: explicit counter, or reconstructed from the
    /// live counters for legacy rows
    pub fn stocked_quantity(&self) -> i64 {
        self.original_quantity
            .unwrap_or(self.quantity + self.selling_quantity)
    }
}

/// Create plant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantCreate {
    pub name: String,
    pub price: i64,
    pub country: String,
    pub image: Option<String>,
    pub discount: Option<i32>,
    pub on_sale: Option<bool>,
    pub quantity: Option<i64>,
}

/// Update plant payload (partial merge; `None` fields are left untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_sale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(price: i64, discount: i32, on_sale: bool) -> Plant {
        Plant {
            id: None,
            name: "Monstera".into(),
            image: String::new(),
            price,
            discount,
            country: "india".into(),
            on_sale,
            quantity: 10,
            selling_quantity: 2,
            original_quantity: Some(12),
            created_by: None,
        }
    }

    #[test]
    fn test_sale_price_rounds() {
        // 999 at 15% off = 849.15 → 849
        assert_eq!(plant(999, 15, true).sale_price(), 849);
        // 100 at 33% off = 67
        assert_eq!(plant(100, 33, true).sale_price(), 67);
        // not on sale: base price regardless of discount field
        assert_eq!(plant(999, 15, false).sale_price(), 999);
        // on sale with zero discount: base price
        assert_eq!(plant(999, 0, true).sale_price(), 999);
    }

    #[test]
    fn test_stocked_quantity_backfill() {
        let mut p = plant(100, 0, false);
        assert_eq!(p.stocked_quantity(), 12);
        p.original_quantity = None;
        assert_eq!(p.stocked_quantity(), 12); // quantity + selling_quantity
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = PlantUpdate {
            price: Some(450),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, "{\"price\":450}");
    }
}
