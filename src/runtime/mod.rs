//! System wiring: configuration and the [`PancakeShop`] runtime that
//! assembles the service, the record logger and their shutdown.

mod tracing;

pub use self::tracing::setup_tracing;

use std::sync::Arc;
use std::time::Duration;

use ::tracing::{error, info};

use crate::model::validator::AddressValidator;
use crate::service::{log_records, ChannelSink, ManagementService};

/// Tunables for a running shop.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// How long `prepare_order` / `deliver_order` wait for work before
    /// reporting an idle pipeline.
    pub stage_timeout: Duration,
    /// How long the cook and courier workers keep polling.
    pub worker_run: Duration,
    /// Number of concurrent customer workers.
    pub customers: usize,
    /// Number of concurrent courier workers.
    pub couriers: usize,
    /// Orders each customer places.
    pub orders_per_customer: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(15),
            worker_run: Duration::from_secs(20),
            customers: 3,
            couriers: 3,
            orders_per_customer: 10,
        }
    }
}

/// The assembled shop: the management service plus the record logger task.
///
/// Dropping the service closes the record channel; [`shutdown`]
/// (PancakeShop::shutdown) waits for the logger to drain what was emitted.
pub struct PancakeShop {
    service: Arc<ManagementService>,
    logger: tokio::task::JoinHandle<()>,
}

impl PancakeShop {
    /// Wires the store, stage queues, record channel and logger task.
    pub fn new(config: &ShopConfig, validator: Arc<dyn AddressValidator>) -> Self {
        let (sink, records) = ChannelSink::new();
        let logger = tokio::spawn(log_records(records));
        let service = Arc::new(ManagementService::new(
            Some(validator),
            Arc::new(sink),
            config.stage_timeout,
        ));
        info!("pancake shop is open");
        Self { service, logger }
    }

    /// A handle to the orchestrator, to share with worker tasks.
    pub fn service(&self) -> Arc<ManagementService> {
        self.service.clone()
    }

    /// Shuts the shop down: releases the service (closing the record
    /// channel once every worker handle is gone) and joins the logger.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("closing the pancake shop");
        drop(self.service);
        if let Err(e) = self.logger.await {
            error!("record logger task failed: {e:?}");
            return Err(format!("record logger task failed: {e:?}"));
        }
        info!("shutdown complete");
        Ok(())
    }
}
