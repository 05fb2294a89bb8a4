//! Address validation: a fixed, ordered rule chain over a pluggable map of
//! valid buildings and rooms.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::order::Address;

/// A violated address rule. One variant per rule, checked in declaration
/// order; validation stops at the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid address: building not set")]
    BuildingNotSet,
    #[error("Invalid address: room not set")]
    RoomNotSet,
    #[error("Invalid address: building not found")]
    BuildingNotFound,
    #[error("Invalid address: room not found")]
    RoomNotFound,
}

/// Pluggable source of valid delivery destinations.
///
/// Implementors only provide the building → rooms mapping; the rule chain in
/// [`validate`](AddressValidator::validate) is shared by all implementations.
pub trait AddressValidator: Send + Sync {
    /// The buildings the shop delivers to, each with its set of valid rooms.
    fn valid_buildings_and_rooms(&self) -> HashMap<String, HashSet<String>>;

    /// Runs the rule chain: building set, room set, building known, room
    /// known within that building. Fails fast on the first violated rule.
    fn validate(&self, address: &Address) -> Result<(), ValidationError> {
        if address.building().trim().is_empty() {
            return Err(ValidationError::BuildingNotSet);
        }
        if address.room().trim().is_empty() {
            return Err(ValidationError::RoomNotSet);
        }
        let destinations = self.valid_buildings_and_rooms();
        let rooms = destinations
            .get(address.building())
            .ok_or(ValidationError::BuildingNotFound)?;
        if !rooms.contains(address.room()) {
            return Err(ValidationError::RoomNotFound);
        }
        Ok(())
    }
}

/// Validator backed by a fixed map, for wiring and tests.
pub struct StaticAddressValidator {
    destinations: HashMap<String, HashSet<String>>,
}

impl StaticAddressValidator {
    pub fn new(destinations: HashMap<String, HashSet<String>>) -> Self {
        Self { destinations }
    }
}

impl AddressValidator for StaticAddressValidator {
    fn valid_buildings_and_rooms(&self) -> HashMap<String, HashSet<String>> {
        self.destinations.clone()
    }
}
