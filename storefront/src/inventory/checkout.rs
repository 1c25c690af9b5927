//! Checkout
//!
//! Converts a user's cart into an order as one logical transaction: either
//! every line is reserved, the order and its items exist, and the cart is
//! empty, or nothing changed. A line that cannot be fully reserved rejects
//! the whole checkout; reservations already taken are released again.

use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};

use super::engine::ReservationEngine;
use crate::db::models::{Order, OrderItem};
use crate::db::repository::record_id;
use crate::utils::time::now_millis;

/// The outcome of a successful checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl ReservationEngine {
    /// Check out a user's cart
    ///
    /// Order total is the sum of cart line subtotals; each order item
    /// snapshots its cart line's price (not the live plant price).
    pub async fn checkout(&self, user_id: &str) -> AppResult<CheckoutReceipt> {
        let cart = self.cart();
        let lines = cart.find_by_user(user_id).await?;
        if lines.is_empty() {
            return Err(AppError::order_empty());
        }

        // Phase 1: reserve every line, releasing everything on the first
        // failure so a rejected checkout has no effect on stock.
        let mut reserved: Vec<(String, i64)> = Vec::new();
        for line in &lines {
            let key = line.plant.to_string();
            let lock = self.store.locks.get(&key);
            let guard = lock.lock().await;
            match self.reserve_in_lock(&key, line.qty).await {
                Ok(_) => {
                    drop(guard);
                    reserved.push((key, line.qty));
                }
                Err(err) => {
                    drop(guard);
                    self.rollback_reservations(&reserved).await;
                    return Err(err);
                }
            }
        }

        // Phase 2: write the order and its lines.
        let orders = self.orders();
        let total: i64 = lines.iter().map(|l| l.subtotal()).sum();
        let order = match orders
            .create(Order {
                id: None,
                user: record_id("users", user_id),
                date: now_millis(),
                total,
            })
            .await
        {
            Ok(order) => order,
            Err(err) => {
                self.rollback_reservations(&reserved).await;
                return Err(err.into());
            }
        };
        let order_rid = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("created order has no id"))?;
        let order_key = order_rid.to_string();

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let created = orders
                .create_item(OrderItem {
                    id: None,
                    order: order_rid.clone(),
                    plant: line.plant.clone(),
                    name: line.name.clone(),
                    qty: line.qty,
                    price: line.price,
                })
                .await;
            match created {
                Ok(item) => items.push(item),
                Err(err) => {
                    self.undo_order(&order_key, &items, &reserved).await;
                    return Err(err.into());
                }
            }
        }

        // Phase 3: the cart lines are consumed. A failure here also unwinds
        // the order: a checkout that leaves its cart behind would double
        // stock on a retry.
        let line_ids: Vec<String> = lines
            .iter()
            .filter_map(|l| l.id.as_ref().map(|i| i.to_string()))
            .collect();
        if let Err(err) = cart.clear_user(user_id).await {
            self.undo_order(&order_key, &items, &reserved).await;
            return Err(err.into());
        }

        self.publish_order_created(&order);
        self.publish_cart_cleared(&line_ids);
        tracing::info!(
            order = %order_key,
            user = user_id,
            total,
            lines = items.len(),
            "checkout complete"
        );

        Ok(CheckoutReceipt { order, items })
    }

    /// Release previously taken reservations (reverse order)
    async fn rollback_reservations(&self, reserved: &[(String, i64)]) {
        for (key, qty) in reserved.iter().rev() {
            let lock = self.store.locks.get(key);
            let guard = lock.lock().await;
            if let Err(err) = self.release_in_lock(key, *qty).await {
                tracing::error!(plant = %key, qty, error = %err, "rollback release failed");
            }
            drop(guard);
        }
    }

    /// Delete a half-written order and release its reservations
    async fn undo_order(
        &self,
        order_id: &str,
        items: &[OrderItem],
        reserved: &[(String, i64)],
    ) {
        let orders = self.orders();
        for item in items {
            if let Some(id) = item.id.as_ref() {
                if let Err(err) = orders.delete_item(&id.to_string()).await {
                    tracing::error!(item = %id, error = %err, "rollback item delete failed");
                }
            }
        }
        if let Err(err) = orders.delete(order_id).await {
            tracing::error!(order = order_id, error = %err, "rollback order delete failed");
        }
        self.rollback_reservations(reserved).await;
    }
}
