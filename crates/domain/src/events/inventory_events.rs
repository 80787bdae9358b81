use super::EventType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inventory event that has not been persisted yet. The event store
/// assigns the id at append time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInventoryEvent {
    pub wine_id: i64,
    pub event_type: EventType,
    pub acquisition_type: Option<String>,
    pub quantity: i32,
    pub price: Option<f64>,
    pub bought_at: Option<String>,
    pub event_date: DateTime<Utc>,
    pub error_quantity: Option<i32>,
}

impl NewInventoryEvent {
    /// Build an `add` event for bottles entering the cellar.
    pub fn acquisition(
        wine_id: i64,
        quantity: i32,
        acquisition_type: Option<String>,
        price: Option<f64>,
        bought_at: Option<String>,
        event_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            wine_id,
            event_type: EventType::Add,
            acquisition_type,
            quantity,
            price,
            bought_at,
            event_date: event_date.unwrap_or_else(Utc::now),
            error_quantity: None,
        }
    }

    /// Build a `drink` event for bottles leaving the cellar.
    pub fn consumption(wine_id: i64, quantity: i32, event_date: Option<DateTime<Utc>>) -> Self {
        Self {
            wine_id,
            event_type: EventType::Drink,
            acquisition_type: None,
            quantity,
            price: None,
            bought_at: None,
            event_date: event_date.unwrap_or_else(Utc::now),
            error_quantity: None,
        }
    }

    /// Build a zero-quantity `drink` event carrying only a consumption
    /// correction. The original drink event stays untouched.
    pub fn correction(
        wine_id: i64,
        error_quantity: i32,
        event_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            wine_id,
            event_type: EventType::Drink,
            acquisition_type: None,
            quantity: 0,
            price: None,
            bought_at: None,
            event_date: event_date.unwrap_or_else(Utc::now),
            error_quantity: Some(error_quantity),
        }
    }

    /// Attach the id assigned by the store.
    pub fn into_stored(self, id: i64) -> StoredInventoryEvent {
        StoredInventoryEvent {
            id,
            wine_id: self.wine_id,
            event_type: self.event_type,
            acquisition_type: self.acquisition_type,
            quantity: self.quantity,
            price: self.price,
            bought_at: self.bought_at,
            event_date: self.event_date,
            error_quantity: self.error_quantity,
        }
    }
}

/// A persisted ledger entry. Immutable once appended; corrections are new
/// events, never edits. Field names are the storage schema and must not
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredInventoryEvent {
    pub id: i64,
    pub wine_id: i64,
    pub event_type: EventType,
    pub acquisition_type: Option<String>,
    pub quantity: i32,
    pub price: Option<f64>,
    pub bought_at: Option<String>,
    pub event_date: DateTime<Utc>,
    pub error_quantity: Option<i32>,
}

impl StoredInventoryEvent {
    /// Sort key for replay: business time first, insertion order breaks ties.
    pub fn sort_key(&self) -> (DateTime<Utc>, i64) {
        (self.event_date, self.id)
    }
}
