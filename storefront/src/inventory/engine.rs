//! Reservation primitives
//!
//! The single set of operations through which order line items and plant
//! stock counters change together. See the module docs for the counter
//! model.

use shared::{AppError, AppResult, ChangeAction};

use crate::core::Store;
use crate::db::models::{Order, OrderItem, Plant};
use crate::db::repository::{CartRepository, OrderRepository, PlantRepository};

pub const RESOURCE_PLANTS: &str = "plants";
pub const RESOURCE_ORDERS: &str = "orders";
pub const RESOURCE_ORDER_ITEMS: &str = "order_items";
pub const RESOURCE_CART: &str = "cart";

#[derive(Clone)]
pub struct ReservationEngine {
    pub(crate) store: Store,
}

impl ReservationEngine {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub(crate) fn plants(&self) -> PlantRepository {
        PlantRepository::new(self.store.db.clone())
    }

    pub(crate) fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.store.db.clone())
    }

    pub(crate) fn cart(&self) -> CartRepository {
        CartRepository::new(self.store.db.clone())
    }

    /// Canonical lock key for a plant id in either `"plants:key"` or bare form
    fn plant_key(plant_id: &str) -> String {
        PlantRepository::id(plant_id).to_string()
    }

    // =========================================================================
    // Counter primitives
    // =========================================================================

    /// Move `qty` units of a plant from available to reserved
    ///
    /// Fails with `OutOfStock` (and no effect) when fewer than `qty` units
    /// are available, `PlantNotFound` when the plant does not exist.
    pub async fn reserve(&self, plant_id: &str, qty: i64) -> AppResult<Plant> {
        let key = Self::plant_key(plant_id);
        let lock = self.store.locks.get(&key);
        let _guard = lock.lock().await;
        self.reserve_in_lock(&key, qty).await
    }

    /// Return `qty` units of a plant from reserved to available
    ///
    /// Tolerates a deleted plant (returns `Ok(None)`): order lines may
    /// outlive their plant, and removing such a line must still succeed.
    pub async fn release(&self, plant_id: &str, qty: i64) -> AppResult<Option<Plant>> {
        let key = Self::plant_key(plant_id);
        let lock = self.store.locks.get(&key);
        let _guard = lock.lock().await;
        self.release_in_lock(&key, qty).await
    }

    /// Reserve while already holding the plant's lock
    pub(crate) async fn reserve_in_lock(&self, plant_key: &str, qty: i64) -> AppResult<Plant> {
        let plants = self.plants();
        match plants.reserve(plant_key, qty).await? {
            Some(plant) => {
                self.publish_plant(&plant);
                Ok(plant)
            }
            // The conditional update matched nothing: missing or short
            None => match plants.find_by_id(plant_key).await? {
                Some(plant) => Err(AppError::out_of_stock(plant.name.clone())
                    .with_detail("requested", qty)
                    .with_detail("available", plant.quantity)),
                None => Err(AppError::plant_not_found(plant_key)),
            },
        }
    }

    /// Release while already holding the plant's lock
    pub(crate) async fn release_in_lock(
        &self,
        plant_key: &str,
        qty: i64,
    ) -> AppResult<Option<Plant>> {
        match self.plants().release(plant_key, qty).await? {
            Some(plant) => {
                self.publish_plant(&plant);
                Ok(Some(plant))
            }
            None => {
                tracing::warn!(plant = plant_key, qty, "release on missing plant, skipped");
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Line item primitives
    // =========================================================================

    /// Add one unit of a plant to an order
    ///
    /// Upserts the (order, plant) line: an existing line grows by one, a new
    /// line snapshots the plant's current name and base price. Reserves
    /// exactly one unit, and only a successful reservation touches the line.
    pub async fn add_line_item(&self, order_id: &str, plant_id: &str) -> AppResult<OrderItem> {
        let orders = self.orders();
        let order = orders
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))?;
        let order_rid = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("fetched order has no id"))?;

        let key = Self::plant_key(plant_id);
        let lock = self.store.locks.get(&key);
        let _guard = lock.lock().await;

        let reserved = self.reserve_in_lock(&key, 1).await?;

        let result = match orders.find_item(order_id, &key).await {
            Ok(Some(existing)) => {
                let line_id = existing
                    .id
                    .as_ref()
                    .map(|i| i.to_string())
                    .unwrap_or_default();
                orders.set_item_qty(&line_id, existing.qty + 1).await
            }
            Ok(None) => {
                orders
                    .create_item(OrderItem {
                        id: None,
                        order: order_rid,
                        plant: PlantRepository::id(&key),
                        name: reserved.name.clone(),
                        qty: 1,
                        price: reserved.price,
                    })
                    .await
            }
            Err(e) => Err(e),
        };

        let item = match result {
            Ok(item) => item,
            Err(e) => {
                // Undo the reservation so the failed write has no net effect
                if let Err(release_err) = self.release_in_lock(&key, 1).await {
                    tracing::error!(plant = %key, error = %release_err, "rollback release failed");
                }
                return Err(e.into());
            }
        };
        drop(_guard);

        self.publish_item(&item, ChangeAction::Updated);
        self.recalc_order_total(order_id).await?;
        Ok(item)
    }

    /// Grow a line by one unit
    pub async fn increase_line_qty(&self, line_id: &str) -> AppResult<OrderItem> {
        let orders = self.orders();
        let line = orders
            .get_item(line_id)
            .await?
            .ok_or_else(|| AppError::order_item_not_found(line_id))?;

        let key = line.plant.to_string();
        let lock = self.store.locks.get(&key);
        let _guard = lock.lock().await;

        self.reserve_in_lock(&key, 1).await?;

        let item = match orders.set_item_qty(line_id, line.qty + 1).await {
            Ok(item) => item,
            Err(e) => {
                if let Err(release_err) = self.release_in_lock(&key, 1).await {
                    tracing::error!(plant = %key, error = %release_err, "rollback release failed");
                }
                return Err(e.into());
            }
        };
        drop(_guard);

        self.publish_item(&item, ChangeAction::Updated);
        self.recalc_order_total(&line.order.to_string()).await?;
        Ok(item)
    }

    /// Shrink a line by one unit, deleting it at quantity one
    ///
    /// Returns the surviving line, or `None` when the line was removed.
    pub async fn decrease_line_qty(&self, line_id: &str) -> AppResult<Option<OrderItem>> {
        let orders = self.orders();
        let line = orders
            .get_item(line_id)
            .await?
            .ok_or_else(|| AppError::order_item_not_found(line_id))?;

        let key = line.plant.to_string();
        let lock = self.store.locks.get(&key);
        let _guard = lock.lock().await;

        let survivor = if line.qty <= 1 {
            orders.delete_item(line_id).await?;
            None
        } else {
            Some(orders.set_item_qty(line_id, line.qty - 1).await?)
        };
        self.release_in_lock(&key, 1).await?;
        drop(_guard);

        match &survivor {
            Some(item) => self.publish_item(item, ChangeAction::Updated),
            None => self.publish_item(&line, ChangeAction::Deleted),
        }
        self.recalc_order_total(&line.order.to_string()).await?;
        Ok(survivor)
    }

    /// Remove a line entirely, releasing its full quantity
    pub async fn remove_line_item(&self, line_id: &str) -> AppResult<()> {
        let orders = self.orders();
        let line = orders
            .get_item(line_id)
            .await?
            .ok_or_else(|| AppError::order_item_not_found(line_id))?;

        let key = line.plant.to_string();
        let lock = self.store.locks.get(&key);
        let _guard = lock.lock().await;

        orders.delete_item(line_id).await?;
        self.release_in_lock(&key, line.qty).await?;
        drop(_guard);

        self.publish_item(&line, ChangeAction::Deleted);
        self.recalc_order_total(&line.order.to_string()).await?;
        Ok(())
    }

    /// Override a line's unit price snapshot
    pub async fn set_line_price(&self, line_id: &str, price: i64) -> AppResult<OrderItem> {
        if price < 0 {
            return Err(AppError::invalid_price(price));
        }
        let orders = self.orders();
        let line = orders
            .get_item(line_id)
            .await?
            .ok_or_else(|| AppError::order_item_not_found(line_id))?;

        let item = orders.set_item_price(line_id, price).await?;
        self.publish_item(&item, ChangeAction::Updated);
        self.recalc_order_total(&line.order.to_string()).await?;
        Ok(item)
    }

    /// Recompute and persist an order's total from its lines
    ///
    /// Idempotent: a second call without an intervening line mutation writes
    /// the same value.
    pub async fn recalc_order_total(&self, order_id: &str) -> AppResult<i64> {
        let orders = self.orders();
        let items = orders.items_for_order(order_id).await?;
        let total: i64 = items.iter().map(|i| i.line_total()).sum();
        let order = orders.set_total(order_id, total).await?;
        self.store.publish(
            RESOURCE_ORDERS,
            ChangeAction::Updated,
            order_id,
            serde_json::to_value(&order).ok(),
        );
        Ok(total)
    }

    // =========================================================================
    // Event helpers
    // =========================================================================

    pub(crate) fn publish_plant(&self, plant: &Plant) {
        let id = plant.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        self.store.publish(
            RESOURCE_PLANTS,
            ChangeAction::Updated,
            id,
            serde_json::to_value(plant).ok(),
        );
    }

    pub(crate) fn publish_item(&self, item: &OrderItem, action: ChangeAction) {
        let id = item.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        let data = match action {
            ChangeAction::Deleted => None,
            _ => serde_json::to_value(item).ok(),
        };
        self.store.publish(RESOURCE_ORDER_ITEMS, action, id, data);
    }

    pub(crate) fn publish_order_created(&self, order: &Order) {
        let id = order.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        self.store.publish(
            RESOURCE_ORDERS,
            ChangeAction::Created,
            id,
            serde_json::to_value(order).ok(),
        );
    }

    pub(crate) fn publish_cart_cleared(&self, line_ids: &[String]) {
        for id in line_ids {
            self.store
                .publish(RESOURCE_CART, ChangeAction::Deleted, id.clone(), None);
        }
    }
}
