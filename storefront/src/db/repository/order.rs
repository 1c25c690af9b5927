//! Order Repository
//!
//! Order headers and line items. Totals are not computed here: the
//! reservation engine derives them and writes them back via [`set_total`];
//! this layer only persists what it is given.
//!
//! [`set_total`]: OrderRepository::set_total

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Order, OrderItem};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ORDER_TABLE: &str = "orders";
const ITEM_TABLE: &str = "order_items";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn id(id: &str) -> RecordId {
        record_id(ORDER_TABLE, id)
    }

    pub fn item_id(id: &str) -> RecordId {
        record_id(ITEM_TABLE, id)
    }

    // =========================================================================
    // Order headers
    // =========================================================================

    /// Create an order header
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Get an order by id
    pub async fn get(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(Self::id(id)).await?;
        Ok(order)
    }

    /// All orders, oldest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY date")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// A user's orders, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE user = $user ORDER BY date DESC")
            .bind(("user", record_id("users", user_id)))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders whose date falls in `[from, to]` (epoch ms, inclusive)
    pub async fn find_in_range(&self, from: i64, to: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE date >= $from AND date <= $to ORDER BY date")
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Persist a recomputed total
    pub async fn set_total(&self, id: &str, total: i64) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET total = $total RETURN AFTER")
            .bind(("id", Self::id(id)))
            .bind(("total", total))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Delete an order header (checkout rollback only)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let _: Option<Order> = self.base.db().delete(Self::id(id)).await?;
        Ok(())
    }

    // =========================================================================
    // Line items
    // =========================================================================

    /// All items of an order
    pub async fn items_for_order(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_items WHERE order = $order")
            .bind(("order", Self::id(order_id)))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Items of any of the given orders (reporting joins)
    pub async fn items_for_orders(&self, order_ids: Vec<RecordId>) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_items WHERE order IN $orders")
            .bind(("orders", order_ids))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// The unique line for an (order, plant) pair, if any
    pub async fn find_item(
        &self,
        order_id: &str,
        plant_id: &str,
    ) -> RepoResult<Option<OrderItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_items WHERE order = $order AND plant = $plant LIMIT 1")
            .bind(("order", Self::id(order_id)))
            .bind(("plant", record_id("plants", plant_id)))
            .await?;
        let items: Vec<OrderItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Get a line item by id
    pub async fn get_item(&self, id: &str) -> RepoResult<Option<OrderItem>> {
        let item: Option<OrderItem> = self.base.db().select(Self::item_id(id)).await?;
        Ok(item)
    }

    /// Create a line item
    pub async fn create_item(&self, item: OrderItem) -> RepoResult<OrderItem> {
        let created: Option<OrderItem> = self.base.db().create(ITEM_TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order item".to_string()))
    }

    /// Set a line's quantity
    pub async fn set_item_qty(&self, id: &str, qty: i64) -> RepoResult<OrderItem> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET qty = $qty RETURN AFTER")
            .bind(("id", Self::item_id(id)))
            .bind(("qty", qty))
            .await?;
        let items: Vec<OrderItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order item {} not found", id)))
    }

    /// Set a line's unit price snapshot
    pub async fn set_item_price(&self, id: &str, price: i64) -> RepoResult<OrderItem> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET price = $price RETURN AFTER")
            .bind(("id", Self::item_id(id)))
            .bind(("price", price))
            .await?;
        let items: Vec<OrderItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order item {} not found", id)))
    }

    /// Delete a line item
    pub async fn delete_item(&self, id: &str) -> RepoResult<()> {
        let _: Option<OrderItem> = self.base.db().delete(Self::item_id(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(user: &str, date: i64) -> Order {
        Order {
            id: None,
            user: record_id("users", user),
            date,
            total: 0,
        }
    }

    fn item(order_id: &RecordId, plant: &str, qty: i64, price: i64) -> OrderItem {
        OrderItem {
            id: None,
            order: order_id.clone(),
            plant: record_id("plants", plant),
            name: "Fern".into(),
            qty,
            price,
        }
    }

    async fn repo() -> OrderRepository {
        OrderRepository::new(crate::db::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_find_by_user_newest_first() {
        let repo = repo().await;
        repo.create(order("u1", 100)).await.unwrap();
        repo.create(order("u1", 300)).await.unwrap();
        repo.create(order("u1", 200)).await.unwrap();
        repo.create(order("u2", 400)).await.unwrap();

        let orders = repo.find_by_user("u1").await.unwrap();
        let dates: Vec<i64> = orders.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn test_find_in_range_inclusive() {
        let repo = repo().await;
        repo.create(order("u1", 100)).await.unwrap();
        repo.create(order("u1", 200)).await.unwrap();
        repo.create(order("u1", 300)).await.unwrap();

        let in_range = repo.find_in_range(100, 200).await.unwrap();
        assert_eq!(in_range.len(), 2);
    }

    #[tokio::test]
    async fn test_item_pair_lookup() {
        let repo = repo().await;
        let created = repo.create(order("u1", 100)).await.unwrap();
        let order_id = created.id.unwrap();

        repo.create_item(item(&order_id, "p1", 2, 100)).await.unwrap();
        repo.create_item(item(&order_id, "p2", 1, 50)).await.unwrap();

        let found = repo
            .find_item(&order_id.to_string(), "p1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.qty, 2);
        assert!(
            repo.find_item(&order_id.to_string(), "p3")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_set_total_missing_order() {
        let repo = repo().await;
        assert!(matches!(
            repo.set_total("missing", 10).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }
}
