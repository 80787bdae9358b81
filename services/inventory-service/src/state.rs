use anyhow::Result;
use cellar_common::config::AppConfig;
use cellar_event_store::{EventStore, PostgresEventStore};
use cellar_ledger::{LedgerService, PostgresWineCatalog, WineCatalog};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub catalog: Arc<dyn WineCatalog>,
}

impl AppState {
    /// Create a new application state
    pub async fn new() -> Result<Self> {
        dotenv::dotenv().ok();

        let config = AppConfig::from_env();
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| config.database.url());

        info!("Connecting to database: {}", database_url);
        let pool = PgPool::connect(&database_url).await?;

        info!("Creating event store");
        let event_store = PostgresEventStore::new(pool.clone());
        event_store.migrate().await?;

        info!("Creating wine catalog");
        let wine_catalog = PostgresWineCatalog::new(pool);
        wine_catalog.migrate().await?;

        let store: Arc<dyn EventStore> = Arc::new(event_store);
        let catalog: Arc<dyn WineCatalog> = Arc::new(wine_catalog);

        let mut ledger = LedgerService::new(store, catalog.clone());
        if let Some(ms) = config.storage_timeout_ms {
            info!("Bounding storage calls at {}ms", ms);
            ledger = ledger.with_storage_timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            ledger: Arc::new(ledger),
            catalog,
        })
    }
}
