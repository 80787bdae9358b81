use async_trait::async_trait;
use cellar_domain::commands::{
    RecordAcquisitionCommand, RecordConsumptionCommand, RecordCorrectionCommand,
};
use cellar_domain::{NewInventoryEvent, NewWine, StoredInventoryEvent, WineType};
use cellar_event_store::{EventStore, InMemoryEventStore, StorageError};
use cellar_ledger::{InMemoryWineCatalog, LedgerError, LedgerService, WineCatalog};
use std::sync::Arc;
use std::time::Duration;

async fn setup() -> (LedgerService, Arc<InMemoryEventStore>, i64) {
    let store = Arc::new(InMemoryEventStore::new());
    let catalog = Arc::new(InMemoryWineCatalog::new());
    let wine = catalog
        .register(NewWine {
            name: "Côte-Rôtie La Landonne".to_string(),
            producer: "Domaine Jamet".to_string(),
            vintage: Some(2019),
            wine_type: Some(WineType::Red),
        })
        .await
        .unwrap();

    (
        LedgerService::new(store.clone(), catalog),
        store,
        wine.id,
    )
}

fn acquire(wine_id: i64, quantity: i32) -> RecordAcquisitionCommand {
    RecordAcquisitionCommand {
        wine_id,
        quantity,
        acquisition_type: Some("purchase".to_string()),
        price: None,
        bought_at: None,
        event_date: None,
    }
}

fn drink(wine_id: i64, quantity: i32) -> RecordConsumptionCommand {
    RecordConsumptionCommand {
        wine_id,
        quantity,
        event_date: None,
    }
}

#[tokio::test]
async fn test_acquire_drink_correct_walkthrough() {
    let (service, _store, wine_id) = setup().await;

    let summary = service.record_acquisition(acquire(wine_id, 12)).await.unwrap();
    assert_eq!(summary.current_stock, 12);

    let summary = service.record_consumption(drink(wine_id, 5)).await.unwrap();
    assert_eq!(summary.current_stock, 7);
    let drink_event_id = 2;

    // Over-drawing fails and leaves stock untouched.
    let err = service.record_consumption(drink(wine_id, 10)).await.unwrap_err();
    match err {
        LedgerError::InsufficientStock {
            requested,
            available,
            ..
        } => {
            assert_eq!(requested, 10);
            assert_eq!(available, 7);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.get_stock(wine_id).await.unwrap().current_stock, 7);

    // Two bottles of the recorded drink turned out to be breakage.
    let summary = service
        .record_correction(RecordCorrectionCommand {
            wine_id,
            original_drink_event_id: drink_event_id,
            error_quantity: 2,
            event_date: None,
        })
        .await
        .unwrap();
    assert_eq!(summary.current_stock, 9);
    assert_eq!(summary.total_acquired, 12);
    assert_eq!(summary.total_consumed, 5);
}

#[tokio::test]
async fn test_failed_consumption_appends_nothing() {
    let (service, store, wine_id) = setup().await;

    service.record_acquisition(acquire(wine_id, 3)).await.unwrap();
    assert_eq!(store.count_for_wine(wine_id).await, 1);

    let result = service.record_consumption(drink(wine_id, 4)).await;
    assert!(matches!(result, Err(LedgerError::InsufficientStock { .. })));
    assert_eq!(store.count_for_wine(wine_id).await, 1);
}

#[tokio::test]
async fn test_zero_event_wine_reports_zero_summary() {
    let (service, _store, wine_id) = setup().await;

    let summary = service.get_stock(wine_id).await.unwrap();
    assert_eq!(summary.current_stock, 0);
    assert_eq!(summary.total_acquired, 0);
    assert_eq!(summary.total_consumed, 0);
    assert!(summary.last_event_at.is_none());

    // Same for a wine the catalog has never seen; reads are not an error.
    let summary = service.get_stock(wine_id + 40).await.unwrap();
    assert_eq!(summary.current_stock, 0);
}

#[tokio::test]
async fn test_backdated_consumption_is_vetted_at_its_date() {
    use chrono::{Duration as ChronoDuration, Utc};

    let (service, _store, wine_id) = setup().await;

    service.record_acquisition(acquire(wine_id, 6)).await.unwrap();

    // Backdating before the acquisition would make that prefix negative.
    let result = service
        .record_consumption(RecordConsumptionCommand {
            wine_id,
            quantity: 2,
            event_date: Some(Utc::now() - ChronoDuration::days(30)),
        })
        .await;

    assert!(matches!(result, Err(LedgerError::InsufficientStock { .. })));
}

#[tokio::test]
async fn test_negative_correction_cannot_underflow_stock() {
    let (service, _store, wine_id) = setup().await;

    service.record_acquisition(acquire(wine_id, 2)).await.unwrap();
    service.record_consumption(drink(wine_id, 2)).await.unwrap();

    // Under-counted consumption: removing one more bottle than exists.
    let result = service
        .record_correction(RecordCorrectionCommand {
            wine_id,
            original_drink_event_id: 2,
            error_quantity: -1,
            event_date: None,
        })
        .await;

    assert!(matches!(result, Err(LedgerError::InsufficientStock { .. })));
    assert_eq!(service.get_stock(wine_id).await.unwrap().current_stock, 0);
}

#[tokio::test]
async fn test_correction_against_unknown_event_is_not_found() {
    let (service, _store, wine_id) = setup().await;

    service.record_acquisition(acquire(wine_id, 6)).await.unwrap();
    service.record_consumption(drink(wine_id, 1)).await.unwrap();

    let result = service
        .record_correction(RecordCorrectionCommand {
            wine_id,
            original_drink_event_id: 999,
            error_quantity: 1,
            event_date: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(LedgerError::DrinkEventNotFound { event_id: 999, .. })
    ));
}

#[tokio::test]
async fn test_concurrent_consumptions_serialize_per_wine() {
    let (service, _store, wine_id) = setup().await;
    let service = Arc::new(service);

    service.record_acquisition(acquire(wine_id, 10)).await.unwrap();

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.record_consumption(drink(wine_id, 6)).await })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move { service.record_consumption(drink(wine_id, 6)).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let rejections = results
        .iter()
        .filter(|r| matches!(r, Err(LedgerError::InsufficientStock { .. })))
        .count();

    // Stock 10 covers one drink of 6, never both.
    assert_eq!(successes, 1);
    assert_eq!(rejections, 1);

    let summary = service.get_stock(wine_id).await.unwrap();
    assert_eq!(summary.current_stock, 4);
}

#[tokio::test]
async fn test_operations_on_different_wines_do_not_block() {
    let store = Arc::new(InMemoryEventStore::new());
    let catalog = Arc::new(InMemoryWineCatalog::new());
    let mut wine_ids = Vec::new();
    for i in 0..4 {
        let wine = catalog
            .register(NewWine {
                name: format!("Wine {i}"),
                producer: "Various".to_string(),
                vintage: None,
                wine_type: None,
            })
            .await
            .unwrap();
        wine_ids.push(wine.id);
    }

    let service = Arc::new(LedgerService::new(store, catalog));

    let mut handles = Vec::new();
    for wine_id in wine_ids.clone() {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.record_acquisition(acquire(wine_id, 3)).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    for wine_id in wine_ids {
        assert_eq!(service.get_stock(wine_id).await.unwrap().current_stock, 3);
    }
}

/// Store stub whose appends hang long enough to trip the service deadline.
struct SlowStore {
    inner: InMemoryEventStore,
    delay: Duration,
}

#[async_trait]
impl EventStore for SlowStore {
    async fn append(
        &self,
        event: NewInventoryEvent,
    ) -> Result<StoredInventoryEvent, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(event).await
    }

    async fn list_by_wine(
        &self,
        wine_id: i64,
    ) -> Result<Vec<StoredInventoryEvent>, StorageError> {
        self.inner.list_by_wine(wine_id).await
    }
}

#[tokio::test]
async fn test_storage_timeout_surfaces_as_storage_error() {
    let store = Arc::new(SlowStore {
        inner: InMemoryEventStore::new(),
        delay: Duration::from_millis(200),
    });
    let catalog = Arc::new(InMemoryWineCatalog::new());
    let wine = catalog
        .register(NewWine {
            name: "Vin Jaune".to_string(),
            producer: "Domaine Overnoy".to_string(),
            vintage: Some(2015),
            wine_type: Some(WineType::White),
        })
        .await
        .unwrap();

    let service = LedgerService::new(store, catalog)
        .with_storage_timeout(Duration::from_millis(20));

    let result = service.record_acquisition(acquire(wine.id, 1)).await;
    assert!(matches!(
        result,
        Err(LedgerError::Storage(StorageError::Timeout))
    ));
}
