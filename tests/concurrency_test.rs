//! Concurrency properties: no lost updates, FIFO hand-off, exactly-once
//! delivery, and a full multi-worker run that drains cleanly.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use pancake_shop::model::{Address, OrderId, RecipeBook, StaticAddressValidator};
use pancake_shop::service::{CollectingSink, ManagementService};
use pancake_shop::workers::place_order;

fn service() -> Arc<ManagementService> {
    let rooms: HashSet<String> = (1..=10).map(|room| room.to_string()).collect();
    let validator = StaticAddressValidator::new(HashMap::from([
        ("1".to_string(), rooms.clone()),
        ("2".to_string(), rooms),
    ]));
    Arc::new(ManagementService::new(
        Some(Arc::new(validator)),
        Arc::new(CollectingSink::new()),
        Duration::from_millis(100),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_additions_to_one_order_lose_nothing() {
    const TASKS: u32 = 8;
    const PER_TASK: u32 = 250;

    let service = service();
    let book = Arc::new(RecipeBook::new());
    let id = service
        .create_order(Address::new("1", "5"))
        .expect("create")
        .id();

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let service = service.clone();
            let book = book.clone();
            tokio::spawn(async move {
                for _ in 0..PER_TASK {
                    service
                        .add_items(id, book.milk_chocolate_pancake(), 1)
                        .expect("add");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task");
    }

    let order = service.get_order(id).expect("get");
    assert_eq!(order.item_count(), TASKS * PER_TASK);
}

#[tokio::test]
async fn orders_are_prepared_in_completion_order() {
    let service = service();
    let book = RecipeBook::new();

    let mut completed = Vec::new();
    for room in ["1", "2", "3"] {
        let id = service
            .create_order(Address::new("1", room))
            .expect("create")
            .id();
        service
            .add_items(id, book.milk_chocolate_pancake(), 1)
            .expect("add");
        service.complete_order(id).expect("complete");
        completed.push(id);
    }

    let mut prepared = Vec::new();
    while let Some(order) = service.prepare_order().await.expect("prepare") {
        prepared.push(order.id());
    }
    assert_eq!(prepared, completed, "FIFO by completion time");

    let mut delivered = Vec::new();
    while let Some(order) = service.deliver_order().await.expect("deliver") {
        delivered.push(order.id());
    }
    assert_eq!(delivered, completed, "FIFO by preparation time");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_couriers_deliver_each_order_exactly_once() {
    const ORDERS: usize = 40;

    let service = service();
    let book = RecipeBook::new();

    let mut expected = HashSet::new();
    for n in 0..ORDERS {
        let id = service
            .create_order(Address::new("1", ((n % 10) + 1).to_string()))
            .expect("create")
            .id();
        service
            .add_items(id, book.dark_chocolate_pancake(), 1)
            .expect("add");
        service.complete_order(id).expect("complete");
        expected.insert(id);
    }
    while service.prepare_order().await.expect("prepare").is_some() {}

    let couriers: Vec<_> = (0..2)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                let mut seen: Vec<OrderId> = Vec::new();
                while let Some(order) = service.deliver_order().await.expect("deliver") {
                    seen.push(order.id());
                }
                seen
            })
        })
        .collect();

    let mut delivered = Vec::new();
    for courier in couriers {
        delivered.extend(courier.await.expect("courier task"));
    }

    assert_eq!(delivered.len(), ORDERS, "nothing duplicated");
    assert_eq!(
        delivered.iter().copied().collect::<HashSet<_>>(),
        expected,
        "nothing dropped"
    );
    assert_eq!(service.order_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn a_busy_shop_drains_completely() {
    const CUSTOMERS: u32 = 3;
    const ORDERS_EACH: u32 = 10;

    let service = service();
    let book = Arc::new(RecipeBook::new());

    let customers: Vec<_> = (0..CUSTOMERS)
        .map(|customer| {
            let service = service.clone();
            let book = book.clone();
            tokio::spawn(async move {
                for i in 0..ORDERS_EACH {
                    // Every order either reaches the pipeline or is cancelled.
                    place_order(&service, &book, customer * 100 + i).expect("order");
                }
            })
        })
        .collect();
    for customer in customers {
        customer.await.expect("customer task");
    }

    // Drain the kitchen, then the couriers.
    while service.prepare_order().await.expect("prepare").is_some() {}
    while service.deliver_order().await.expect("deliver").is_some() {}

    assert!(service.list_completed_orders().is_empty());
    assert!(service.list_prepared_orders().is_empty());
    assert_eq!(service.order_count(), 0, "every order was delivered or cancelled");
}
