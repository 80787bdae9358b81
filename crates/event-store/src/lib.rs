pub mod memory_event_store;
pub mod postgres_event_store;

pub use memory_event_store::InMemoryEventStore;
pub use postgres_event_store::PostgresEventStore;

use async_trait::async_trait;
use cellar_domain::{NewInventoryEvent, StoredInventoryEvent};
use thiserror::Error;

/// Append-only storage of inventory events, queryable by wine.
///
/// The store never interprets `event_type` and never computes stock; it is
/// purely the durability layer under the ledger.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Assign the next id, persist the event atomically and return the
    /// stored record. On failure nothing has been appended.
    async fn append(&self, event: NewInventoryEvent)
        -> Result<StoredInventoryEvent, StorageError>;

    /// All events for a wine in `(event_date, id)` order; a snapshot at call
    /// time, empty if the wine has no events.
    async fn list_by_wine(&self, wine_id: i64)
        -> Result<Vec<StoredInventoryEvent>, StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage operation timed out")]
    Timeout,
}
