use super::{EventStore, StorageError};
use async_trait::async_trait;
use cellar_domain::{EventType, NewInventoryEvent, StoredInventoryEvent};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

/// PostgreSQL implementation of the event store.
///
/// Ids come from a `BIGSERIAL` column, so they are monotonically assigned at
/// append time and double as the tie-break within one `event_date`.
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the database pool (useful for testing)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the events table and its replay index if they do not exist.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory_events (
                id BIGSERIAL PRIMARY KEY,
                wine_id BIGINT NOT NULL,
                event_type TEXT NOT NULL,
                acquisition_type TEXT,
                quantity INTEGER NOT NULL,
                price DOUBLE PRECISION,
                bought_at TEXT,
                event_date TIMESTAMPTZ NOT NULL,
                error_quantity INTEGER,
                recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_inventory_events_wine
             ON inventory_events (wine_id, event_date, id)",
        )
        .execute(&self.pool)
        .await?;

        info!("Inventory event schema is up to date");
        Ok(())
    }
}

fn event_from_row(row: &PgRow) -> Result<StoredInventoryEvent, StorageError> {
    let event_type: String = row.get("event_type");
    let event_type: EventType = event_type
        .parse()
        .map_err(|e| StorageError::Database(sqlx::Error::Decode(Box::new(e))))?;

    Ok(StoredInventoryEvent {
        id: row.get("id"),
        wine_id: row.get("wine_id"),
        event_type,
        acquisition_type: row.get("acquisition_type"),
        quantity: row.get("quantity"),
        price: row.get("price"),
        bought_at: row.get("bought_at"),
        event_date: row.get("event_date"),
        error_quantity: row.get("error_quantity"),
    })
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn append(
        &self,
        event: NewInventoryEvent,
    ) -> Result<StoredInventoryEvent, StorageError> {
        debug!(
            "Appending {} event for wine {}: quantity={}",
            event.event_type.as_str(),
            event.wine_id,
            event.quantity
        );

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO inventory_events (
                wine_id, event_type, acquisition_type, quantity,
                price, bought_at, event_date, error_quantity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(event.wine_id)
        .bind(event.event_type.as_str())
        .bind(&event.acquisition_type)
        .bind(event.quantity)
        .bind(event.price)
        .bind(&event.bought_at)
        .bind(event.event_date)
        .bind(event.error_quantity)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Appended event {} for wine {} ({})",
            id,
            event.wine_id,
            event.event_type.as_str()
        );

        Ok(event.into_stored(id))
    }

    async fn list_by_wine(
        &self,
        wine_id: i64,
    ) -> Result<Vec<StoredInventoryEvent>, StorageError> {
        debug!("Loading events for wine {}", wine_id);

        let rows = sqlx::query(
            r#"
            SELECT id, wine_id, event_type, acquisition_type, quantity,
                   price, bought_at, event_date, error_quantity
            FROM inventory_events
            WHERE wine_id = $1
            ORDER BY event_date ASC, id ASC
            "#,
        )
        .bind(wine_id)
        .fetch_all(&self.pool)
        .await?;

        let events = rows
            .iter()
            .map(event_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} events for wine {}", events.len(), wine_id);

        Ok(events)
    }
}
