//! The pipeline orchestrator.
//!
//! [`ManagementService`] is the only surface callers use. It sequences the
//! order store and the two stage queues so that each client-visible operation
//! is a single business transaction, and emits one transition record per
//! successful operation, after the state change it describes.
//!
//! Per order, the state machine is:
//!
//! ```text
//! New --(complete, items > 0)--> Completed --(prepare)--> Prepared --(deliver)--> removed
//! New | Completed | Prepared --(cancel)--> removed
//! New --(complete, items == 0)--> removed        (implicit cancellation)
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::model::order::{Address, Order, OrderId};
use crate::model::recipe::Recipe;
use crate::model::validator::AddressValidator;
use crate::service::error::ServiceError;
use crate::service::record::{RecordSink, TransitionKind, TransitionRecord};
use crate::stage::StageQueue;
use crate::store::OrderStore;

/// Outcome of [`ManagementService::complete_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The order moved to Completed and now awaits preparation.
    Completed,
    /// The order was empty; completing it cancelled it instead.
    CancelledEmpty,
}

/// Orchestrates the order store and the stage queues.
///
/// Safe for arbitrary concurrent invocation; callers need no external
/// locking. Only [`prepare_order`](Self::prepare_order) and
/// [`deliver_order`](Self::deliver_order) can block, bounded by the
/// configured stage timeout.
pub struct ManagementService {
    store: OrderStore,
    awaiting_preparation: StageQueue<OrderId>,
    awaiting_delivery: StageQueue<OrderId>,
    validator: Option<Arc<dyn AddressValidator>>,
    sink: Arc<dyn RecordSink>,
    stage_timeout: Duration,
}

impl ManagementService {
    /// Builds the orchestrator. The validator is an explicit dependency:
    /// passing `None` makes every `create_order` fail with
    /// [`ServiceError::ValidatorNotConfigured`].
    pub fn new(
        validator: Option<Arc<dyn AddressValidator>>,
        sink: Arc<dyn RecordSink>,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            store: OrderStore::new(),
            awaiting_preparation: StageQueue::new(),
            awaiting_delivery: StageQueue::new(),
            validator,
            sink,
            stage_timeout,
        }
    }

    /// Validates the address and creates a new order.
    pub fn create_order(&self, address: Address) -> Result<Order, ServiceError> {
        let validator = self
            .validator
            .as_deref()
            .ok_or(ServiceError::ValidatorNotConfigured)?;
        validator.validate(&address)?;

        let order = Order::new(address);
        self.store.create(order.clone())?;
        info!(order_id = %order.id(), building = %order.address().building(),
            room = %order.address().room(), "order created");
        self.emit(&order, TransitionKind::Created);
        Ok(order)
    }

    /// Snapshot of an order.
    pub fn get_order(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.store.get(id)
    }

    /// One description string per pancake on the order.
    pub fn view_order(&self, id: OrderId) -> Result<Vec<String>, ServiceError> {
        self.store.item_descriptions(id)
    }

    /// Number of orders currently held by the store.
    pub fn order_count(&self) -> usize {
        self.store.len()
    }

    /// Adds `count` pancakes of `recipe` to the order.
    pub fn add_items(
        &self,
        id: OrderId,
        recipe: Recipe,
        count: u32,
    ) -> Result<(), ServiceError> {
        let order = self.store.add_items(id, recipe, count)?;
        debug!(order_id = %id, added = count, total = order.item_count(), "pancakes added");
        self.emit(
            &order,
            TransitionKind::ItemsAdded {
                added: count,
                total: order.item_count(),
            },
        );
        Ok(())
    }

    /// Removes up to `count` pancakes of `recipe` from the order. A recipe
    /// that is not on the order removes nothing and is not an error.
    pub fn remove_items(
        &self,
        id: OrderId,
        recipe: &Recipe,
        count: u32,
    ) -> Result<(), ServiceError> {
        let (removed, order) = self.store.remove_items(id, recipe, count)?;
        debug!(order_id = %id, removed, total = order.item_count(), "pancakes removed");
        self.emit(
            &order,
            TransitionKind::ItemsRemoved {
                removed,
                total: order.item_count(),
            },
        );
        Ok(())
    }

    /// Hands a New order to the preparation stage.
    ///
    /// An empty order cannot be completed: it is removed instead, as an
    /// implicit cancellation. Otherwise the status is advanced to Completed
    /// *before* the id is pushed, so a consumer popping the id always
    /// observes the advanced status.
    pub fn complete_order(&self, id: OrderId) -> Result<Completion, ServiceError> {
        if self.store.order_is_empty(id)? {
            let order = self.store.remove(id)?;
            warn!(order_id = %id, "completing an empty order cancels it");
            self.emit(&order, TransitionKind::Cancelled { items: 0 });
            return Ok(Completion::CancelledEmpty);
        }

        let order = self.store.advance_status(id)?;
        self.awaiting_preparation.push(id);
        info!(order_id = %id, items = order.item_count(), "order completed");
        self.emit(
            &order,
            TransitionKind::Completed {
                items: order.item_count(),
            },
        );
        Ok(Completion::Completed)
    }

    /// Takes the next completed order, advances it to Prepared and hands it
    /// to the delivery stage. Returns `Ok(None)` when no order shows up
    /// within the stage timeout — an idle pipeline, not a failure.
    pub async fn prepare_order(&self) -> Result<Option<Order>, ServiceError> {
        let Some(id) = self.awaiting_preparation.pop(self.stage_timeout).await else {
            return Ok(None);
        };
        let order = match self.store.advance_status(id) {
            Ok(order) => order,
            Err(ServiceError::OrderNotFound(_)) => {
                // Cancelled while queued; the entry is stale.
                warn!(order_id = %id, "order vanished while awaiting preparation");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        self.awaiting_delivery.push(id);
        info!(order_id = %id, items = order.item_count(), "order prepared");
        self.emit(
            &order,
            TransitionKind::Prepared {
                items: order.item_count(),
            },
        );
        Ok(Some(order))
    }

    /// Takes the next prepared order and removes it from the store —
    /// delivered orders are not retained. Returns `Ok(None)` on timeout.
    pub async fn deliver_order(&self) -> Result<Option<Order>, ServiceError> {
        let Some(id) = self.awaiting_delivery.pop(self.stage_timeout).await else {
            return Ok(None);
        };
        let order = match self.store.remove(id) {
            Ok(order) => order,
            Err(ServiceError::OrderNotFound(_)) => {
                warn!(order_id = %id, "order vanished while awaiting delivery");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        info!(order_id = %id, items = order.item_count(), "order out for delivery");
        self.emit(
            &order,
            TransitionKind::Delivered {
                items: order.item_count(),
            },
        );
        Ok(Some(order))
    }

    /// Removes the order regardless of its current status.
    pub fn cancel_order(&self, id: OrderId) -> Result<Order, ServiceError> {
        let order = self.store.remove(id)?;
        info!(order_id = %id, items = order.item_count(), "order cancelled");
        self.emit(
            &order,
            TransitionKind::Cancelled {
                items: order.item_count(),
            },
        );
        Ok(order)
    }

    /// Ids currently queued for preparation. A snapshot; may be stale the
    /// instant after it is taken.
    pub fn list_completed_orders(&self) -> HashSet<OrderId> {
        self.awaiting_preparation.snapshot()
    }

    /// Ids currently queued for delivery. A snapshot, like
    /// [`list_completed_orders`](Self::list_completed_orders).
    pub fn list_prepared_orders(&self) -> HashSet<OrderId> {
        self.awaiting_delivery.snapshot()
    }

    fn emit(&self, order: &Order, kind: TransitionKind) {
        self.sink.emit(TransitionRecord::new(order, kind));
    }
}
