use async_trait::async_trait;
use cellar_domain::{NewWine, Wine, WineType};
use cellar_event_store::StorageError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::info;

/// Lookup port into the wine catalog.
///
/// The catalog proper (tasting notes, tags, producers) is owned by the
/// collection CRUD outside this crate; the ledger only needs to know that a
/// wine exists before events may reference it, plus the minimal
/// registration and lookup the demo service and tests use.
#[async_trait]
pub trait WineCatalog: Send + Sync {
    async fn exists(&self, wine_id: i64) -> Result<bool, StorageError>;

    async fn get(&self, wine_id: i64) -> Result<Option<Wine>, StorageError>;

    async fn register(&self, wine: NewWine) -> Result<Wine, StorageError>;
}

/// In-memory catalog for tests and the storage-free service mode.
#[derive(Default)]
pub struct InMemoryWineCatalog {
    wines: RwLock<HashMap<i64, Wine>>,
    next_id: AtomicI64,
}

impl InMemoryWineCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WineCatalog for InMemoryWineCatalog {
    async fn exists(&self, wine_id: i64) -> Result<bool, StorageError> {
        Ok(self.wines.read().await.contains_key(&wine_id))
    }

    async fn get(&self, wine_id: i64) -> Result<Option<Wine>, StorageError> {
        Ok(self.wines.read().await.get(&wine_id).cloned())
    }

    async fn register(&self, wine: NewWine) -> Result<Wine, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let wine = Wine {
            id,
            name: wine.name,
            producer: wine.producer,
            vintage: wine.vintage,
            wine_type: wine.wine_type,
        };
        self.wines.write().await.insert(id, wine.clone());
        Ok(wine)
    }
}

/// Catalog lookups against the application's `wines` table.
pub struct PostgresWineCatalog {
    pool: PgPool,
}

impl PostgresWineCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the wines table if it does not exist.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wines (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                producer TEXT NOT NULL,
                vintage INTEGER,
                wine_type TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Wine catalog schema is up to date");
        Ok(())
    }
}

fn wine_from_row(row: &PgRow) -> Result<Wine, StorageError> {
    let wine_type: Option<String> = row.get("wine_type");
    let wine_type: Option<WineType> = wine_type
        .map(|s| {
            s.parse().map_err(|e: cellar_domain::wine::UnknownWineType| {
                StorageError::Database(sqlx::Error::Decode(Box::new(e)))
            })
        })
        .transpose()?;

    Ok(Wine {
        id: row.get("id"),
        name: row.get("name"),
        producer: row.get("producer"),
        vintage: row.get("vintage"),
        wine_type,
    })
}

#[async_trait]
impl WineCatalog for PostgresWineCatalog {
    async fn exists(&self, wine_id: i64) -> Result<bool, StorageError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM wines WHERE id = $1)")
                .bind(wine_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn get(&self, wine_id: i64) -> Result<Option<Wine>, StorageError> {
        let row = sqlx::query(
            "SELECT id, name, producer, vintage, wine_type FROM wines WHERE id = $1",
        )
        .bind(wine_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(wine_from_row).transpose()
    }

    async fn register(&self, wine: NewWine) -> Result<Wine, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO wines (name, producer, vintage, wine_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&wine.name)
        .bind(&wine.producer)
        .bind(wine.vintage)
        .bind(wine.wine_type.map(|t| t.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(Wine {
            id: row.get("id"),
            name: wine.name,
            producer: wine.producer,
            vintage: wine.vintage,
            wine_type: wine.wine_type,
        })
    }
}
