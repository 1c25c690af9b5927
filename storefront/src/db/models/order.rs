//! Order Models

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type OrderId = RecordId;

/// Order header
///
/// `total` is derived: it must equal the sum of `price * qty` over the
/// order's items and is recomputed after every line mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<OrderId>,
    pub user: RecordId,
    /// Creation timestamp, epoch milliseconds
    pub date: i64,
    pub total: i64,
}

/// Order line item
///
/// `name` and `price` are snapshots at time of sale, immune to later catalog
/// changes. One line per (order, plant); lookups use that pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Option<RecordId>,
    pub order: RecordId,
    pub plant: RecordId,
    pub name: String,
    pub qty: i64,
    /// Unit price snapshot at time of sale
    pub price: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.price * self.qty
    }
}

/// Order header plus its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order header with the buyer joined in, for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithUser {
    #[serde(flatten)]
    pub order: Order,
    pub user_email: String,
    pub user_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: None,
            order: ("orders", "o1").into(),
            plant: ("plants", "p1").into(),
            name: "Fern".into(),
            qty: 3,
            price: 120,
        };
        assert_eq!(item.line_total(), 360);
    }
}
