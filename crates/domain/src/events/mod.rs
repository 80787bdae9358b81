pub mod inventory_events;

pub use inventory_events::{NewInventoryEvent, StoredInventoryEvent};

use serde::{Deserialize, Serialize};

/// Kind of ledger entry. The sign of the quantity is implied by the type;
/// quantities are stored positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Add,
    Drink,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Add => "add",
            EventType::Drink => "drink",
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(EventType::Add),
            "drink" => Ok(EventType::Drink),
            other => Err(UnknownEventType(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);
