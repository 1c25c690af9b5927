//! Order Service
//!
//! Checkout entry point, order queries, and the order editor shared by the
//! admin and user editing flows. Both flows drive the same reservation
//! engine and differ only in authorization.

use shared::{AppError, AppResult, SessionUser};

use super::ensure_admin;
use crate::core::Store;
use crate::db::models::{Order, OrderDetail, OrderItem, OrderWithUser};
use crate::db::repository::{OrderRepository, UserRepository, record_id};
use crate::inventory::{CheckoutReceipt, ReservationEngine};

#[derive(Clone)]
pub struct OrderService {
    store: Store,
}

impl OrderService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn repo(&self) -> OrderRepository {
        OrderRepository::new(self.store.db.clone())
    }

    /// Check out the actor's cart
    pub async fn checkout(&self, actor: &SessionUser) -> AppResult<CheckoutReceipt> {
        self.store.engine().checkout(&actor.id).await
    }

    /// The actor's orders, newest first
    pub async fn orders_for_user(&self, actor: &SessionUser) -> AppResult<Vec<Order>> {
        Ok(self.repo().find_by_user(&actor.id).await?)
    }

    /// One order with its lines; owners and admins only
    pub async fn detail(&self, actor: &SessionUser, order_id: &str) -> AppResult<OrderDetail> {
        let repo = self.repo();
        let order = repo
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))?;
        authorize(actor, &order)?;

        let items = repo.items_for_order(order_id).await?;
        Ok(OrderDetail { order, items })
    }

    /// Every order with its buyer joined in (admin dashboard)
    pub async fn list_all(&self, actor: &SessionUser) -> AppResult<Vec<OrderWithUser>> {
        ensure_admin(actor)?;
        let users = UserRepository::new(self.store.db.clone());

        let orders = self.repo().find_all().await?;
        let mut rows = Vec::with_capacity(orders.len());
        for order in orders {
            let buyer = users.find_by_id(&order.user.to_string()).await?;
            let (user_email, user_name) = match buyer {
                Some(u) => (u.email, u.username),
                None => ("Unknown".to_string(), "N/A".to_string()),
            };
            rows.push(OrderWithUser {
                order,
                user_email,
                user_name,
            });
        }
        Ok(rows)
    }

    /// Open an order for editing
    ///
    /// Admins may edit any order; users only their own.
    pub async fn edit(&self, actor: &SessionUser, order_id: &str) -> AppResult<OrderEditor> {
        let order = self
            .repo()
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))?;
        authorize(actor, &order)?;

        Ok(OrderEditor {
            engine: self.store.engine(),
            order_id: OrderRepository::id(order_id).to_string(),
            admin: actor.is_admin(),
        })
    }
}

fn authorize(actor: &SessionUser, order: &Order) -> AppResult<()> {
    if actor.is_admin() || order.user == record_id("users", &actor.id) {
        Ok(())
    } else {
        Err(AppError::permission_denied("Order belongs to another user"))
    }
}

/// An order opened for editing
///
/// Every mutation routes through the reservation engine, so admin and user
/// edits keep the stock counters consistent the same way checkout does.
pub struct OrderEditor {
    engine: ReservationEngine,
    order_id: String,
    admin: bool,
}

impl OrderEditor {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Current lines of the order
    pub async fn items(&self) -> AppResult<Vec<OrderItem>> {
        Ok(self.engine.orders().items_for_order(&self.order_id).await?)
    }

    /// Add one unit of a plant to the order
    pub async fn add_plant(&self, plant_id: &str) -> AppResult<OrderItem> {
        self.engine.add_line_item(&self.order_id, plant_id).await
    }

    /// Grow a line by one unit
    pub async fn increase(&self, line_id: &str) -> AppResult<OrderItem> {
        self.line_in_order(line_id).await?;
        self.engine.increase_line_qty(line_id).await
    }

    /// Shrink a line by one unit, deleting it at quantity one
    pub async fn decrease(&self, line_id: &str) -> AppResult<Option<OrderItem>> {
        self.line_in_order(line_id).await?;
        self.engine.decrease_line_qty(line_id).await
    }

    /// Remove a line entirely
    pub async fn remove(&self, line_id: &str) -> AppResult<()> {
        self.line_in_order(line_id).await?;
        self.engine.remove_line_item(line_id).await
    }

    /// Override a line's price snapshot (admins only)
    pub async fn set_price(&self, line_id: &str, price: i64) -> AppResult<OrderItem> {
        if !self.admin {
            return Err(AppError::admin_required());
        }
        self.line_in_order(line_id).await?;
        self.engine.set_line_price(line_id, price).await
    }

    /// Reject line ids that belong to some other order
    async fn line_in_order(&self, line_id: &str) -> AppResult<()> {
        let line = self
            .engine
            .orders()
            .get_item(line_id)
            .await?
            .ok_or_else(|| AppError::order_item_not_found(line_id))?;
        if line.order.to_string() != self.order_id {
            return Err(AppError::order_item_not_found(line_id));
        }
        Ok(())
    }
}
