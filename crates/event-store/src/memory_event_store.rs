use super::{EventStore, StorageError};
use async_trait::async_trait;
use cellar_domain::{NewInventoryEvent, StoredInventoryEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory implementation of the event store.
///
/// Backs the test suite and the storage-free service mode. Ids come from a
/// process-wide counter, so they stay monotonic across wines just like the
/// database sequence.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<i64, Vec<StoredInventoryEvent>>>,
    next_id: AtomicI64,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(0),
        }
    }

    /// Number of events recorded for a wine (useful for testing).
    pub async fn count_for_wine(&self, wine_id: i64) -> usize {
        self.events
            .read()
            .await
            .get(&wine_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(
        &self,
        event: NewInventoryEvent,
    ) -> Result<StoredInventoryEvent, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = event.into_stored(id);

        let mut events = self.events.write().await;
        events.entry(stored.wine_id).or_default().push(stored.clone());

        debug!("Appended event {} for wine {}", id, stored.wine_id);

        Ok(stored)
    }

    async fn list_by_wine(
        &self,
        wine_id: i64,
    ) -> Result<Vec<StoredInventoryEvent>, StorageError> {
        let events = self.events.read().await;
        let mut snapshot = events.get(&wine_id).cloned().unwrap_or_default();
        snapshot.sort_by_key(|e| e.sort_key());
        Ok(snapshot)
    }
}
