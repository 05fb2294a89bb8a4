//! Error taxonomy for the order pipeline.

use thiserror::Error;

use crate::model::order::OrderId;
use crate::model::validator::ValidationError;

/// Everything an orchestrator or store operation can fail with.
///
/// All variants are synchronous and leave previously committed state
/// untouched — a failed operation has no partial effect. A stage-queue pop
/// that times out is not an error; it surfaces as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No order is stored under this identifier.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Defensive check on identifier collision at creation.
    #[error("Order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// A line-item mutation was requested with a non-positive count.
    #[error("Invalid pancake count: {0}")]
    InvalidQuantity(u32),

    /// The delivery address violated a validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No address validator was installed at setup time. Distinct from a
    /// validation failure.
    #[error("Address validator is not configured")]
    ValidatorNotConfigured,
}
