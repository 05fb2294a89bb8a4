//! The order store: a concurrent keyed map of order aggregates.
//!
//! All mutation of an order's contents and status goes through this store.
//! Locking is fine-grained: the map itself sits behind an [`RwLock`] taken
//! only for the duration of a lookup (shared) or an insert/remove
//! (exclusive), and every entry carries its own [`Mutex`] guarding the
//! read-modify-write on that single order. Concurrent mutations of different
//! orders never serialize on a store-wide lock.
//!
//! Lock order: an entry mutex is only acquired while holding the map read
//! lock, and the map write lock is never taken while an entry mutex is held.
//! No lock is held across an await point — every operation here is
//! synchronous.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::model::order::{Order, OrderId};
use crate::model::recipe::Recipe;
use crate::service::error::ServiceError;

/// Concurrent in-memory store of order aggregates, keyed by [`OrderId`].
#[derive(Default)]
pub struct OrderStore {
    orders: RwLock<HashMap<OrderId, Mutex<Order>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new order under its identifier.
    pub fn create(&self, order: Order) -> Result<OrderId, ServiceError> {
        let id = order.id();
        let mut orders = self.orders.write();
        match orders.entry(id) {
            Entry::Occupied(_) => Err(ServiceError::DuplicateOrder(id)),
            Entry::Vacant(slot) => {
                slot.insert(Mutex::new(order));
                Ok(id)
            }
        }
    }

    /// Returns a snapshot of the order.
    pub fn get(&self, id: OrderId) -> Result<Order, ServiceError> {
        let orders = self.orders.read();
        let entry = orders.get(&id).ok_or(ServiceError::OrderNotFound(id))?;
        let order = entry.lock().clone();
        Ok(order)
    }

    /// Atomically merges `count` pancakes of `recipe` into the order's line
    /// items and returns the post-mutation snapshot.
    pub fn add_items(
        &self,
        id: OrderId,
        recipe: Recipe,
        count: u32,
    ) -> Result<Order, ServiceError> {
        if count < 1 {
            return Err(ServiceError::InvalidQuantity(count));
        }
        let orders = self.orders.read();
        let entry = orders.get(&id).ok_or(ServiceError::OrderNotFound(id))?;
        let mut order = entry.lock();
        order.add_items(recipe, count);
        Ok(order.clone())
    }

    /// Atomically decrements a line item, dropping the entry when it reaches
    /// zero. A recipe that is not on the order is a no-op, not an error.
    /// Returns how many pancakes were actually removed, with the
    /// post-mutation snapshot.
    pub fn remove_items(
        &self,
        id: OrderId,
        recipe: &Recipe,
        count: u32,
    ) -> Result<(u32, Order), ServiceError> {
        if count < 1 {
            return Err(ServiceError::InvalidQuantity(count));
        }
        let orders = self.orders.read();
        let entry = orders.get(&id).ok_or(ServiceError::OrderNotFound(id))?;
        let mut order = entry.lock();
        let removed = order.remove_items(recipe, count);
        if removed == 0 {
            debug!(order_id = %id, "recipe not on order, nothing removed");
        }
        Ok((removed, order.clone()))
    }

    /// True when the order has no line items.
    pub fn order_is_empty(&self, id: OrderId) -> Result<bool, ServiceError> {
        self.with_order(id, |order| order.is_empty())
    }

    /// Total pancake count across the order's line items.
    pub fn item_count(&self, id: OrderId) -> Result<u32, ServiceError> {
        self.with_order(id, |order| order.item_count())
    }

    /// One description string per pancake on the order.
    pub fn item_descriptions(&self, id: OrderId) -> Result<Vec<String>, ServiceError> {
        self.with_order(id, |order| order.item_descriptions())
    }

    /// Steps the order's status forward (New → Completed → Prepared) and
    /// returns the post-mutation snapshot. The orchestrator is responsible
    /// for calling in sequence.
    pub fn advance_status(&self, id: OrderId) -> Result<Order, ServiceError> {
        let orders = self.orders.read();
        let entry = orders.get(&id).ok_or(ServiceError::OrderNotFound(id))?;
        let mut order = entry.lock();
        order.advance();
        Ok(order.clone())
    }

    /// Deletes the order and returns it.
    pub fn remove(&self, id: OrderId) -> Result<Order, ServiceError> {
        let mut orders = self.orders.write();
        let entry = orders.remove(&id).ok_or(ServiceError::OrderNotFound(id))?;
        Ok(entry.into_inner())
    }

    /// Number of orders currently stored.
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    fn with_order<R>(
        &self,
        id: OrderId,
        read: impl FnOnce(&Order) -> R,
    ) -> Result<R, ServiceError> {
        let orders = self.orders.read();
        let entry = orders.get(&id).ok_or(ServiceError::OrderNotFound(id))?;
        let order = entry.lock();
        Ok(read(&order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::{Address, OrderStatus};
    use crate::model::recipe::RecipeBook;
    use std::sync::Arc;

    fn store_with_order() -> (OrderStore, OrderId) {
        let store = OrderStore::new();
        let id = store
            .create(Order::new(Address::new("1", "5")))
            .expect("create");
        (store, id)
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store = OrderStore::new();
        let order = Order::new(Address::new("1", "5"));
        store.create(order.clone()).expect("first create");
        assert_eq!(
            store.create(order.clone()),
            Err(ServiceError::DuplicateOrder(order.id()))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn additions_merge() {
        let (store, id) = store_with_order();
        let book = RecipeBook::new();
        let recipe = book.milk_chocolate_pancake();

        store.add_items(id, recipe.clone(), 2).expect("add");
        let after = store.add_items(id, recipe, 3).expect("add");
        assert_eq!(after.item_count(), 5);
        assert_eq!(store.item_count(id).expect("count"), 5);
    }

    #[test]
    fn removal_drops_the_entry_at_zero() {
        let (store, id) = store_with_order();
        let book = RecipeBook::new();
        let recipe = book.dark_chocolate_pancake();

        store.add_items(id, recipe.clone(), 2).expect("add");
        let (removed, after) = store.remove_items(id, &recipe, 5).expect("remove");
        assert_eq!(removed, 2);
        assert!(after.is_empty());

        // Absent recipe is a no-op.
        let (removed, _) = store.remove_items(id, &recipe, 1).expect("remove");
        assert_eq!(removed, 0);
    }

    #[test]
    fn zero_counts_are_invalid() {
        let (store, id) = store_with_order();
        let book = RecipeBook::new();
        let recipe = book.milk_chocolate_pancake();
        assert_eq!(
            store.add_items(id, recipe.clone(), 0),
            Err(ServiceError::InvalidQuantity(0))
        );
        assert_eq!(
            store.remove_items(id, &recipe, 0),
            Err(ServiceError::InvalidQuantity(0))
        );
    }

    #[test]
    fn unknown_ids_fail_without_side_effects() {
        let (store, _) = store_with_order();
        let book = RecipeBook::new();
        let ghost = Order::new(Address::new("1", "5")).id();
        assert_eq!(
            store.add_items(ghost, book.milk_chocolate_pancake(), 1),
            Err(ServiceError::OrderNotFound(ghost))
        );
        assert_eq!(store.get(ghost), Err(ServiceError::OrderNotFound(ghost)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn status_steps_through_the_pipeline() {
        let (store, id) = store_with_order();
        assert_eq!(store.get(id).expect("get").status(), OrderStatus::New);
        assert_eq!(
            store.advance_status(id).expect("advance").status(),
            OrderStatus::Completed
        );
        assert_eq!(
            store.advance_status(id).expect("advance").status(),
            OrderStatus::Prepared
        );
        let removed = store.remove(id).expect("remove");
        assert_eq!(removed.id(), id);
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_additions_never_lose_updates() {
        const THREADS: usize = 8;
        const PER_THREAD: u32 = 200;

        let (store, id) = store_with_order();
        let store = Arc::new(store);
        let book = RecipeBook::new();
        let recipe = book.milk_chocolate_pancake();

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = store.clone();
                let recipe = recipe.clone();
                std::thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        store.add_items(id, recipe.clone(), 1).expect("add");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }

        assert_eq!(
            store.item_count(id).expect("count"),
            THREADS as u32 * PER_THREAD
        );
    }
}
