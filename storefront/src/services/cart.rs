//! Cart Service
//!
//! Stock-bounded pending selections. Cart lines never move plant counters
//! (stock is only committed at checkout), but every quantity change is
//! checked against the stock visible at call time, so the cart can never
//! request more than the plant has.

use serde_json::to_value;
use shared::{AppError, AppResult, ChangeAction, SessionUser};

use crate::core::Store;
use crate::db::models::{CartItem, CartTotals, Plant};
use crate::db::repository::{CartRepository, PlantRepository, record_id};
use crate::inventory::engine::RESOURCE_CART;

#[derive(Clone)]
pub struct CartService {
    store: Store,
}

impl CartService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn repo(&self) -> CartRepository {
        CartRepository::new(self.store.db.clone())
    }

    fn plants(&self) -> PlantRepository {
        PlantRepository::new(self.store.db.clone())
    }

    async fn plant_for(&self, plant_id: &str) -> AppResult<Plant> {
        self.plants()
            .find_by_id(plant_id)
            .await?
            .ok_or_else(|| AppError::plant_not_found(plant_id))
    }

    /// Fetch a line and check it belongs to the actor (admins skip the check)
    async fn owned_line(&self, actor: &SessionUser, cart_id: &str) -> AppResult<CartItem> {
        let line = self
            .repo()
            .get(cart_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cart item {}", cart_id)))?;
        if !actor.is_admin() && line.user != record_id("users", &actor.id) {
            return Err(AppError::permission_denied("Cart item belongs to another user"));
        }
        Ok(line)
    }

    fn publish(&self, action: ChangeAction, item: &CartItem) {
        let id = item.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        let data = match action {
            ChangeAction::Deleted => None,
            _ => to_value(item).ok(),
        };
        self.store.publish(RESOURCE_CART, action, id, data);
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unit of a plant to the actor's cart
    ///
    /// A line already at the visible stock limit is refused; a new line
    /// snapshots the discounted price when the plant is on sale, and the
    /// base price as `original_price` either way.
    pub async fn add_to_cart(&self, actor: &SessionUser, plant_id: &str) -> AppResult<CartItem> {
        let plant = self.plant_for(plant_id).await?;
        if plant.quantity <= 0 {
            return Err(AppError::out_of_stock(plant.name));
        }

        let repo = self.repo();
        let item = match repo.find_line(&actor.id, plant_id).await? {
            Some(existing) => {
                if existing.qty >= plant.quantity {
                    return Err(AppError::stock_limit_reached(plant.name)
                        .with_detail("in_cart", existing.qty)
                        .with_detail("available", plant.quantity));
                }
                let id = existing.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
                repo.set_qty(&id, existing.qty + 1).await?
            }
            None => {
                let discount = if plant.on_sale { plant.discount } else { 0 };
                repo.create(CartItem {
                    id: None,
                    user: record_id("users", &actor.id),
                    plant: PlantRepository::id(plant_id),
                    name: plant.name.clone(),
                    price: plant.sale_price(),
                    original_price: plant.price,
                    discount,
                    qty: 1,
                })
                .await?
            }
        };

        self.publish(ChangeAction::Updated, &item);
        Ok(item)
    }

    /// Grow a line by one, bounded by the stock visible at call time
    pub async fn increase_qty(&self, actor: &SessionUser, cart_id: &str) -> AppResult<CartItem> {
        let line = self.owned_line(actor, cart_id).await?;
        let plant = self.plant_for(&line.plant.to_string()).await?;
        if line.qty >= plant.quantity {
            return Err(AppError::stock_limit_reached(plant.name)
                .with_detail("in_cart", line.qty)
                .with_detail("available", plant.quantity));
        }

        let id = line.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        let item = self.repo().set_qty(&id, line.qty + 1).await?;
        self.publish(ChangeAction::Updated, &item);
        Ok(item)
    }

    /// Shrink a line by one, deleting it at quantity one
    ///
    /// Returns the surviving line, or `None` when the line was removed.
    pub async fn decrease_qty(
        &self,
        actor: &SessionUser,
        cart_id: &str,
    ) -> AppResult<Option<CartItem>> {
        let line = self.owned_line(actor, cart_id).await?;
        let id = line.id.as_ref().map(|i| i.to_string()).unwrap_or_default();

        if line.qty <= 1 {
            self.repo().delete(&id).await?;
            self.publish(ChangeAction::Deleted, &line);
            Ok(None)
        } else {
            let item = self.repo().set_qty(&id, line.qty - 1).await?;
            self.publish(ChangeAction::Updated, &item);
            Ok(Some(item))
        }
    }

    /// Remove the actor's line for a plant, if any
    pub async fn remove_by_product(&self, actor: &SessionUser, plant_id: &str) -> AppResult<()> {
        if let Some(line) = self.repo().find_line(&actor.id, plant_id).await? {
            let id = line.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
            self.repo().delete(&id).await?;
            self.publish(ChangeAction::Deleted, &line);
        }
        Ok(())
    }

    /// Delete every line in the actor's cart
    pub async fn clear(&self, actor: &SessionUser) -> AppResult<usize> {
        let lines = self.repo().find_by_user(&actor.id).await?;
        let removed = self.repo().clear_user(&actor.id).await?;
        for line in &lines {
            self.publish(ChangeAction::Deleted, line);
        }
        Ok(removed)
    }

    /// The actor's cart lines
    pub async fn items(&self, actor: &SessionUser) -> AppResult<Vec<CartItem>> {
        Ok(self.repo().find_by_user(&actor.id).await?)
    }

    /// Bill summary over the actor's cart
    pub async fn totals(&self, actor: &SessionUser) -> AppResult<CartTotals> {
        let items = self.items(actor).await?;
        Ok(CartTotals::from_items(&items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::PlantCreate;
    use shared::{ErrorCode, Role};

    fn admin() -> SessionUser {
        SessionUser {
            id: "users:admin".into(),
            username: "admin".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
            country: None,
        }
    }

    fn customer(id: &str) -> SessionUser {
        SessionUser {
            id: format!("users:{id}"),
            username: id.into(),
            email: format!("{id}@example.com"),
            role: Role::User,
            country: Some("india".into()),
        }
    }

    async fn seed_plant(store: &Store, quantity: i64, on_sale: bool, discount: i32) -> String {
        let plant = store
            .catalog()
            .create(
                &admin(),
                PlantCreate {
                    name: "Monstera".into(),
                    price: 1000,
                    country: "india".into(),
                    image: None,
                    discount: Some(discount),
                    on_sale: Some(on_sale),
                    quantity: Some(quantity),
                },
            )
            .await
            .unwrap();
        plant.id.unwrap().to_string()
    }

    #[tokio::test]
    async fn test_add_snapshots_sale_price() {
        let store = Store::open_in_memory().await.unwrap();
        let plant_id = seed_plant(&store, 5, true, 10).await;
        let cart = store.cart();

        let item = cart.add_to_cart(&customer("u1"), &plant_id).await.unwrap();
        assert_eq!(item.price, 900);
        assert_eq!(item.original_price, 1000);
        assert_eq!(item.discount, 10);
        assert_eq!(item.qty, 1);
    }

    #[tokio::test]
    async fn test_add_out_of_stock_refused() {
        let store = Store::open_in_memory().await.unwrap();
        let plant_id = seed_plant(&store, 0, false, 0).await;

        let err = store
            .cart()
            .add_to_cart(&customer("u1"), &plant_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfStock);
    }

    #[tokio::test]
    async fn test_readd_increments_until_stock_limit() {
        let store = Store::open_in_memory().await.unwrap();
        let plant_id = seed_plant(&store, 2, false, 0).await;
        let cart = store.cart();
        let user = customer("u1");

        cart.add_to_cart(&user, &plant_id).await.unwrap();
        let item = cart.add_to_cart(&user, &plant_id).await.unwrap();
        assert_eq!(item.qty, 2);

        let err = cart.add_to_cart(&user, &plant_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StockLimitReached);

        // only one line exists for the pair
        assert_eq!(cart.items(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_increase_bounded_decrease_deletes() {
        let store = Store::open_in_memory().await.unwrap();
        let plant_id = seed_plant(&store, 2, false, 0).await;
        let cart = store.cart();
        let user = customer("u1");

        let item = cart.add_to_cart(&user, &plant_id).await.unwrap();
        let line_id = item.id.unwrap().to_string();

        cart.increase_qty(&user, &line_id).await.unwrap();
        let err = cart.increase_qty(&user, &line_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StockLimitReached);

        assert!(cart.decrease_qty(&user, &line_id).await.unwrap().is_some());
        assert!(cart.decrease_qty(&user, &line_id).await.unwrap().is_none());
        assert!(cart.items(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lines_are_owner_scoped() {
        let store = Store::open_in_memory().await.unwrap();
        let plant_id = seed_plant(&store, 5, false, 0).await;
        let cart = store.cart();

        let item = cart.add_to_cart(&customer("u1"), &plant_id).await.unwrap();
        let line_id = item.id.unwrap().to_string();

        let err = cart
            .increase_qty(&customer("u2"), &line_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_clear_and_totals() {
        let store = Store::open_in_memory().await.unwrap();
        let plant_id = seed_plant(&store, 5, true, 10).await;
        let cart = store.cart();
        let user = customer("u1");

        cart.add_to_cart(&user, &plant_id).await.unwrap();
        cart.add_to_cart(&user, &plant_id).await.unwrap();

        let totals = cart.totals(&user).await.unwrap();
        assert_eq!(totals.payable, 1800);
        assert_eq!(totals.mrp, 2000);
        assert_eq!(totals.saved, 200);

        assert_eq!(cart.clear(&user).await.unwrap(), 1);
        assert_eq!(cart.totals(&user).await.unwrap().payable, 0);
    }
}
