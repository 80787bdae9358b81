use crate::catalog::WineCatalog;
use cellar_domain::commands::{
    RecordAcquisitionCommand, RecordConsumptionCommand, RecordCorrectionCommand,
};
use cellar_domain::{
    EventType, NegativeStockError, NewInventoryEvent, StockSummary, StoredInventoryEvent,
};
use cellar_event_store::{EventStore, StorageError};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("quantity must be a positive number of bottles, got {0}")]
    InvalidQuantity(i32),

    #[error("insufficient stock for wine {wine_id}: requested {requested}, available {available}")]
    InsufficientStock {
        wine_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("wine {0} does not exist")]
    WineNotFound(i64),

    #[error("drink event {event_id} not found for wine {wine_id}")]
    DrinkEventNotFound { wine_id: i64, event_id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persisted history replays negative. Unreachable through this service,
    /// which vets every event before appending; seeing it means the events
    /// table was written around the ledger.
    #[error("inconsistent ledger history: {0}")]
    InconsistentHistory(#[from] NegativeStockError),
}

/// The only mutation entry point into the inventory ledger.
///
/// Validates each command against the wine's replayed state before anything
/// touches storage, so a rejected command never leaves partial state behind.
/// Mutations on the same wine serialize on a per-wine async mutex; wines
/// never contend with each other, and reads take no lock at all.
pub struct LedgerService {
    store: Arc<dyn EventStore>,
    catalog: Arc<dyn WineCatalog>,
    wine_locks: DashMap<i64, Arc<Mutex<()>>>,
    storage_timeout: Option<Duration>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn EventStore>, catalog: Arc<dyn WineCatalog>) -> Self {
        Self {
            store,
            catalog,
            wine_locks: DashMap::new(),
            storage_timeout: None,
        }
    }

    /// Bound every storage call; an elapsed deadline surfaces as
    /// [`StorageError::Timeout`] with no claim about whether the append
    /// landed. The caller re-queries `get_stock` to find out.
    pub fn with_storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = Some(timeout);
        self
    }

    /// Record bottles entering the cellar and return the updated summary.
    pub async fn record_acquisition(
        &self,
        cmd: RecordAcquisitionCommand,
    ) -> Result<StockSummary, LedgerError> {
        if cmd.quantity < 1 {
            return Err(LedgerError::InvalidQuantity(cmd.quantity));
        }
        self.ensure_wine_exists(cmd.wine_id).await?;

        let lock = self.wine_lock(cmd.wine_id);
        let _guard = lock.lock().await;

        let event = NewInventoryEvent::acquisition(
            cmd.wine_id,
            cmd.quantity,
            cmd.acquisition_type,
            cmd.price,
            cmd.bought_at,
            cmd.event_date,
        );

        let stored = self.store_call(self.store.append(event)).await?;
        info!(
            "Recorded acquisition of {} bottles for wine {} (event {})",
            cmd.quantity, cmd.wine_id, stored.id
        );

        self.summarize(cmd.wine_id).await
    }

    /// Record bottles drunk. Rejected with `InsufficientStock` when the
    /// wine's replayed balance cannot cover the quantity; nothing is
    /// appended on rejection.
    pub async fn record_consumption(
        &self,
        cmd: RecordConsumptionCommand,
    ) -> Result<StockSummary, LedgerError> {
        if cmd.quantity < 1 {
            return Err(LedgerError::InvalidQuantity(cmd.quantity));
        }
        self.ensure_wine_exists(cmd.wine_id).await?;

        let lock = self.wine_lock(cmd.wine_id);
        let _guard = lock.lock().await;

        let events = self.store_call(self.store.list_by_wine(cmd.wine_id)).await?;
        let current = StockSummary::from_events(&events)?;

        let event = NewInventoryEvent::consumption(cmd.wine_id, cmd.quantity, cmd.event_date);

        if let Err(rejection) = simulate(&events, &event) {
            warn!(
                "Rejected consumption of {} bottles for wine {}: {} available",
                cmd.quantity, cmd.wine_id, current.current_stock
            );
            debug!("Simulated balance went negative: {}", rejection);
            return Err(LedgerError::InsufficientStock {
                wine_id: cmd.wine_id,
                requested: i64::from(cmd.quantity),
                available: current.current_stock,
            });
        }

        let stored = self.store_call(self.store.append(event)).await?;
        info!(
            "Recorded consumption of {} bottles for wine {} (event {})",
            cmd.quantity, cmd.wine_id, stored.id
        );

        self.summarize(cmd.wine_id).await
    }

    /// Correct a previously recorded consumption by appending a
    /// zero-quantity drink event carrying the error amount. The original
    /// event is validated but never modified.
    pub async fn record_correction(
        &self,
        cmd: RecordCorrectionCommand,
    ) -> Result<StockSummary, LedgerError> {
        self.ensure_wine_exists(cmd.wine_id).await?;

        let lock = self.wine_lock(cmd.wine_id);
        let _guard = lock.lock().await;

        let events = self.store_call(self.store.list_by_wine(cmd.wine_id)).await?;

        let is_known_drink = events.iter().any(|e| {
            e.id == cmd.original_drink_event_id && e.event_type == EventType::Drink
        });
        if !is_known_drink {
            return Err(LedgerError::DrinkEventNotFound {
                wine_id: cmd.wine_id,
                event_id: cmd.original_drink_event_id,
            });
        }

        let current = StockSummary::from_events(&events)?;

        let event =
            NewInventoryEvent::correction(cmd.wine_id, cmd.error_quantity, cmd.event_date);

        // A negative correction removes bottles and gets the same vetting as
        // a consumption.
        if simulate(&events, &event).is_err() {
            warn!(
                "Rejected correction of {} bottles for wine {}: {} available",
                cmd.error_quantity, cmd.wine_id, current.current_stock
            );
            return Err(LedgerError::InsufficientStock {
                wine_id: cmd.wine_id,
                requested: i64::from(-cmd.error_quantity),
                available: current.current_stock,
            });
        }

        let stored = self.store_call(self.store.append(event)).await?;
        info!(
            "Recorded correction of {} bottles for wine {} against event {} (event {})",
            cmd.error_quantity, cmd.wine_id, cmd.original_drink_event_id, stored.id
        );

        self.summarize(cmd.wine_id).await
    }

    /// Current stock summary; a wine with no events yields the zero summary.
    pub async fn get_stock(&self, wine_id: i64) -> Result<StockSummary, LedgerError> {
        let events = self.store_call(self.store.list_by_wine(wine_id)).await?;
        if events.is_empty() {
            return Ok(StockSummary::zero());
        }
        Ok(StockSummary::from_events(&events)?)
    }

    async fn summarize(&self, wine_id: i64) -> Result<StockSummary, LedgerError> {
        let events = self.store_call(self.store.list_by_wine(wine_id)).await?;
        Ok(StockSummary::from_events(&events)?)
    }

    async fn ensure_wine_exists(&self, wine_id: i64) -> Result<(), LedgerError> {
        let exists = self.store_call(self.catalog.exists(wine_id)).await?;
        if !exists {
            return Err(LedgerError::WineNotFound(wine_id));
        }
        Ok(())
    }

    fn wine_lock(&self, wine_id: i64) -> Arc<Mutex<()>> {
        self.wine_locks
            .entry(wine_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn store_call<T, F>(&self, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        match self.storage_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StorageError::Timeout)?,
            None => fut.await,
        }
    }
}

/// Replay the wine's events with the prospective event inserted at its sort
/// position. The candidate gets an id past every stored one, matching what
/// the store will assign, so ties on `event_date` resolve identically
/// before and after the append.
fn simulate(
    events: &[StoredInventoryEvent],
    candidate: &NewInventoryEvent,
) -> Result<StockSummary, NegativeStockError> {
    let next_id = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
    let mut simulated = events.to_vec();
    simulated.push(candidate.clone().into_stored(next_id));
    StockSummary::from_events(&simulated)
}
