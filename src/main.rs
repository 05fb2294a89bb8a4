//! Demo binary: opens the shop, lets customers, a cook and couriers run for
//! a while, then shuts down cleanly.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use pancake_shop::model::{RecipeBook, StaticAddressValidator};
use pancake_shop::runtime::{setup_tracing, PancakeShop, ShopConfig};
use pancake_shop::workers::{run_cook, run_courier, run_customer};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    info!("starting the pancake shop");

    let rooms: HashSet<String> = (1..=10).map(|room| room.to_string()).collect();
    let validator = StaticAddressValidator::new(HashMap::from([
        ("1".to_string(), rooms.clone()),
        ("2".to_string(), rooms),
    ]));

    let config = ShopConfig {
        stage_timeout: Duration::from_secs(1),
        worker_run: Duration::from_secs(5),
        ..ShopConfig::default()
    };
    let shop = PancakeShop::new(&config, Arc::new(validator));
    let service = shop.service();
    let book = Arc::new(RecipeBook::new());

    let mut workers = Vec::new();
    for customer in 0..config.customers {
        workers.push(tokio::spawn(run_customer(
            service.clone(),
            book.clone(),
            customer as u32 * 100 + 1,
            config.orders_per_customer,
        )));
    }
    workers.push(tokio::spawn(run_cook(service.clone(), config.worker_run)));
    for _ in 0..config.couriers {
        workers.push(tokio::spawn(run_courier(service.clone(), config.worker_run)));
    }

    for worker in workers {
        worker
            .await
            .map_err(|e| format!("worker task failed: {e:?}"))?;
    }

    info!(
        remaining_orders = service.order_count(),
        awaiting_preparation = service.list_completed_orders().len(),
        awaiting_delivery = service.list_prepared_orders().len(),
        "workers finished"
    );

    drop(service);
    shop.shutdown().await
}
