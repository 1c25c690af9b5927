//! Cart Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One pending selection in a user's cart
///
/// `name`, `price`, and `original_price` are snapshots taken when the line
/// was created; later catalog edits do not rewrite them. One line exists per
/// (user, plant); re-adding increments `qty`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Option<RecordId>,
    pub user: RecordId,
    pub plant: RecordId,
    pub name: String,
    /// Possibly-discounted unit price snapshot
    pub price: i64,
    /// Pre-discount unit price snapshot
    pub original_price: i64,
    #[serde(default)]
    pub discount: i32,
    pub qty: i64,
}

impl CartItem {
    pub fn subtotal(&self) -> i64 {
        self.price * self.qty
    }
}

/// Bill summary over a user's cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of pre-discount prices
    pub mrp: i64,
    /// Sum of snapshot prices, what the user pays
    pub payable: i64,
    /// `mrp - payable`
    pub saved: i64,
}

impl CartTotals {
    pub fn from_items(items: &[CartItem]) -> Self {
        let mrp = items.iter().map(|i| i.original_price * i.qty).sum();
        let payable = items.iter().map(|i| i.subtotal()).sum();
        Self {
            mrp,
            payable,
            saved: mrp - payable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, original: i64, qty: i64) -> CartItem {
        CartItem {
            id: None,
            user: ("users", "u1").into(),
            plant: ("plants", "p1").into(),
            name: "Fern".into(),
            price,
            original_price: original,
            discount: 0,
            qty,
        }
    }

    #[test]
    fn test_totals() {
        let items = [item(90, 100, 2), item(50, 50, 1)];
        let totals = CartTotals::from_items(&items);
        assert_eq!(totals.mrp, 250);
        assert_eq!(totals.payable, 230);
        assert_eq!(totals.saved, 20);
    }

    #[test]
    fn test_totals_empty() {
        let totals = CartTotals::from_items(&[]);
        assert_eq!(totals.payable, 0);
        assert_eq!(totals.saved, 0);
    }
}
