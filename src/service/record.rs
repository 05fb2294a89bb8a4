//! Transition records: one immutable record per successful state-changing
//! operation, handed to a pluggable sink.
//!
//! Emission is decoupled from the state change itself: the orchestrator
//! commits to the store/queues first, then hands the record to the sink. The
//! production sink is a single-writer channel drained by one logger task, so
//! records from concurrent operations never interleave mid-record and no
//! lock is ever held around store or queue work.

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::model::order::{Order, OrderId};

/// What happened, with the counts relevant to the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionKind {
    Created,
    ItemsAdded { added: u32, total: u32 },
    ItemsRemoved { removed: u32, total: u32 },
    Completed { items: u32 },
    Prepared { items: u32 },
    Delivered { items: u32 },
    Cancelled { items: u32 },
}

/// An immutable log of one successful state-changing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub kind: TransitionKind,
    pub order_id: OrderId,
    pub building: String,
    pub room: String,
}

impl TransitionRecord {
    pub(crate) fn new(order: &Order, kind: TransitionKind) -> Self {
        Self {
            kind,
            order_id: order.id(),
            building: order.address().building().to_string(),
            room: order.address().room().to_string(),
        }
    }
}

/// Destination for transition records. Emission must not block the caller.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: TransitionRecord);
}

/// Production sink: forwards records to a single logger task over an
/// unbounded channel.
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<TransitionRecord>,
}

impl ChannelSink {
    /// Returns the sink and the receiving end to hand to [`log_records`].
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TransitionRecord>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl RecordSink for ChannelSink {
    fn emit(&self, record: TransitionRecord) {
        // Records after the logger has shut down are dropped deliberately.
        let _ = self.sender.send(record);
    }
}

/// Drains a record channel into the log, one line per record, until every
/// sender is gone.
pub async fn log_records(mut receiver: mpsc::UnboundedReceiver<TransitionRecord>) {
    while let Some(record) = receiver.recv().await {
        info!(
            order_id = %record.order_id,
            building = %record.building,
            room = %record.room,
            kind = ?record.kind,
            "order transition"
        );
    }
}

/// Test sink that keeps every record it sees.
#[derive(Default)]
pub struct CollectingSink {
    records: Mutex<Vec<TransitionRecord>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TransitionRecord> {
        self.records.lock().clone()
    }
}

impl RecordSink for CollectingSink {
    fn emit(&self, record: TransitionRecord) {
        self.records.lock().push(record);
    }
}
