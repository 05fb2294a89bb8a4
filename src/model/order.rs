//! The order aggregate and its delivery address.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::recipe::Recipe;

/// Opaque, globally unique order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A delivery address: building and room, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    building: String,
    room: String,
}

impl Address {
    pub fn new(building: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            building: building.into(),
            room: room.into(),
        }
    }

    pub fn building(&self) -> &str {
        &self.building
    }

    pub fn room(&self) -> &str {
        &self.room
    }
}

/// Where an order currently is in the pipeline.
///
/// Delivery is modeled as removal from the store, not as a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Completed,
    Prepared,
}

/// A customer's order: identity, address, status and line items.
///
/// Equality and hashing are by identity alone, never by contents — two
/// snapshots of the same order compare equal even if their line items differ.
/// Line-item counts are strictly positive; a decrement that reaches zero
/// removes the entry.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    address: Address,
    status: OrderStatus,
    items: HashMap<Recipe, u32>,
}

impl Order {
    pub(crate) fn new(address: Address) -> Self {
        Self {
            id: OrderId::new(),
            address,
            status: OrderStatus::New,
            items: HashMap::new(),
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// True when the order has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of pancakes across all line items.
    pub fn item_count(&self) -> u32 {
        self.items.values().sum()
    }

    /// One description string per pancake: a line item with count 3 yields
    /// three identical strings.
    pub fn item_descriptions(&self) -> Vec<String> {
        self.items
            .iter()
            .flat_map(|(recipe, &count)| {
                let description = recipe.to_string();
                std::iter::repeat(description).take(count as usize)
            })
            .collect()
    }

    pub(crate) fn add_items(&mut self, recipe: Recipe, count: u32) {
        *self.items.entry(recipe).or_insert(0) += count;
    }

    /// Decrements a line item, removing the entry when it reaches zero.
    /// Returns how many pancakes were actually removed (0 if the recipe is
    /// not on the order).
    pub(crate) fn remove_items(&mut self, recipe: &Recipe, count: u32) -> u32 {
        match self.items.get_mut(recipe) {
            None => 0,
            Some(current) if *current <= count => {
                let removed = *current;
                self.items.remove(recipe);
                removed
            }
            Some(current) => {
                *current -= count;
                count
            }
        }
    }

    /// Steps the status forward: New → Completed → Prepared.
    ///
    /// Calling this on a prepared order is a sequencing bug in the caller;
    /// the orchestrator is responsible for advancing in order.
    pub(crate) fn advance(&mut self) {
        self.status = match self.status {
            OrderStatus::New => OrderStatus::Completed,
            OrderStatus::Completed => OrderStatus::Prepared,
            OrderStatus::Prepared => {
                debug_assert!(false, "advance called on a prepared order");
                OrderStatus::Prepared
            }
        };
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
