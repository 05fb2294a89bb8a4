//! Worker loops: customers place orders, the cook prepares them, couriers
//! deliver them. Workers only ever call [`ManagementService`] operations;
//! the core is safe under arbitrary concurrent invocation, so they need no
//! coordination among themselves.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::model::order::{Address, OrderId};
use crate::model::recipe::RecipeBook;
use crate::service::{Completion, ManagementService, ServiceError};

/// Places one order: create, a randomly chosen mix of additions and
/// removals, then complete — or cancel, for every third counter value.
///
/// Returns the id of the order if it was handed to the pipeline.
pub fn place_order(
    service: &ManagementService,
    book: &RecipeBook,
    counter: u32,
) -> Result<Option<OrderId>, ServiceError> {
    let building = if counter % 2 == 0 { "1" } else { "2" };
    let room = (counter % 10 + 1).to_string();
    let order = service.create_order(Address::new(building, room))?;
    let id = order.id();

    let mode = rand::rng().random_range(0..5);
    match mode {
        0 => {
            service.add_items(id, book.milk_chocolate_pancake(), 2)?;
            service.remove_items(id, &book.milk_chocolate_pancake(), 1)?;
        }
        1 => {
            // Removes everything again; completing will implicitly cancel.
            service.add_items(id, book.dark_chocolate_pancake(), 2)?;
            service.remove_items(id, &book.dark_chocolate_pancake(), 2)?;
        }
        2 => {
            service.add_items(id, book.dark_chocolate_whipped_cream_hazelnut_pancake(), 2)?;
            service.remove_items(id, &book.milk_chocolate_pancake(), 1)?;
        }
        3 => {
            service.add_items(id, book.dark_chocolate_whipped_cream_pancake(), 2)?;
        }
        _ => {
            service.add_items(id, book.random_recipe(), 2)?;
        }
    }

    if counter % 3 > 0 {
        match service.complete_order(id)? {
            Completion::Completed => Ok(Some(id)),
            Completion::CancelledEmpty => Ok(None),
        }
    } else {
        service.cancel_order(id)?;
        Ok(None)
    }
}

/// Customer worker: places `orders` orders, one after another.
pub async fn run_customer(
    service: Arc<ManagementService>,
    book: Arc<RecipeBook>,
    counter_base: u32,
    orders: u32,
) {
    for i in 0..orders {
        match place_order(&service, &book, counter_base + i) {
            Ok(Some(id)) => debug!(order_id = %id, "customer handed an order to the kitchen"),
            Ok(None) => debug!("customer walked away from an order"),
            Err(e) => warn!(error = %e, "customer order failed"),
        }
    }
}

/// Cook worker: keeps preparing completed orders until the deadline.
pub async fn run_cook(service: Arc<ManagementService>, run_for: Duration) {
    let deadline = Instant::now() + run_for;
    while Instant::now() < deadline {
        match service.prepare_order().await {
            Ok(Some(order)) => debug!(order_id = %order.id(), "cook prepared an order"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "prepare failed"),
        }
    }
}

/// Courier worker: keeps delivering prepared orders until the deadline.
pub async fn run_courier(service: Arc<ManagementService>, run_for: Duration) {
    let deadline = Instant::now() + run_for;
    while Instant::now() < deadline {
        match service.deliver_order().await {
            Ok(Some(order)) => debug!(order_id = %order.id(), "courier picked up an order"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "delivery failed"),
        }
    }
}
