//! PostgreSQL collections.
//!
//! Each collection gets its own pool and its own migration set, so the three
//! URLs may point at separate servers or all at one database.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use paddy_core::config::StorageConfig;
use paddy_core::{CarArrival, CarArrivalUpdate, Scan, Stock, StockFields};

use crate::collection::{CarArrivalStore, ScanStore, StockStore};
use crate::error::StoreError;

/// One pool per database.
#[derive(Clone)]
pub struct PgPools {
    pub car: PgPool,
    pub qr: PgPool,
    pub stock: PgPool,
}

impl PgPools {
    /// Build pools without opening connections. Only URL syntax is checked
    /// here; an unreachable server shows up on the first query.
    pub fn connect_lazy(config: &StorageConfig) -> Result<Self, StoreError> {
        let options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5));

        Ok(Self {
            car: options.clone().connect_lazy(&config.car_url)?,
            qr: options.clone().connect_lazy(&config.qr_url)?,
            stock: options.connect_lazy(&config.stock_url)?,
        })
    }

    /// Apply the embedded migrations of every collection.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        run_migrations("car", sqlx::migrate!("./migrations/car"), &self.car).await?;
        run_migrations("qr", sqlx::migrate!("./migrations/qr"), &self.qr).await?;
        run_migrations("stock", sqlx::migrate!("./migrations/stock"), &self.stock).await?;
        Ok(())
    }
}

async fn run_migrations(name: &str, mut migrator: Migrator, pool: &PgPool) -> Result<(), StoreError> {
    // Versions are unique across the three sets; a shared database will
    // show the other sets' versions as applied.
    migrator.set_ignore_missing(true);
    migrator.run(pool).await?;
    info!("{} migrations applied", name);
    Ok(())
}

// ── Car arrivals ─────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct CarArrivalRow {
    id: Uuid,
    recorded_at: DateTime<Utc>,
    history: Json<Vec<Value>>,
    logs: Json<Vec<Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CarArrivalRow> for CarArrival {
    fn from(row: CarArrivalRow) -> Self {
        CarArrival {
            id: row.id,
            timestamp: row.recorded_at,
            history: row.history.0,
            logs: row.logs.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgCarArrivalStore {
    pool: PgPool,
}

impl PgCarArrivalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarArrivalStore for PgCarArrivalStore {
    async fn latest(&self) -> Result<Option<CarArrival>, StoreError> {
        let row = sqlx::query_as::<_, CarArrivalRow>(
            "SELECT id, recorded_at, history, logs, created_at, updated_at
             FROM car_arrivals WHERE slot = 'current'",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CarArrival::from))
    }

    async fn replace(&self, update: CarArrivalUpdate) -> Result<CarArrival, StoreError> {
        let row = sqlx::query_as::<_, CarArrivalRow>(
            "INSERT INTO car_arrivals (slot, id, history, logs)
             VALUES ('current', $1, $2, $3)
             ON CONFLICT (slot) DO UPDATE
               SET history = EXCLUDED.history,
                   logs = EXCLUDED.logs,
                   recorded_at = NOW(),
                   updated_at = NOW()
             RETURNING id, recorded_at, history, logs, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(Json(&update.history))
        .bind(Json(&update.logs))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

// ── Scans ────────────────────────────────────────────────────

pub struct PgScanStore {
    pool: PgPool,
}

impl PgScanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanStore for PgScanStore {
    async fn insert(&self, fields: Map<String, Value>) -> Result<Scan, StoreError> {
        let id = Uuid::new_v4();
        // Bound as text so the server keeps the document byte for byte.
        let doc = serde_json::to_string(&fields)?;
        sqlx::query("INSERT INTO scans (id, doc) VALUES ($1, $2::json)")
            .bind(id)
            .bind(doc)
            .execute(&self.pool)
            .await?;

        Ok(Scan { id, fields })
    }

    async fn list_newest_first(&self) -> Result<Vec<Scan>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, Json<Map<String, Value>>)>(
            "SELECT id, doc FROM scans ORDER BY seq DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(fields))| Scan { id, fields })
            .collect())
    }
}

// ── Stock ────────────────────────────────────────────────────

const STOCK_COLUMNS: &str =
    "id, last_update, date, stock_type, bags, weight, car_no, party_name, unloader_name";

#[derive(sqlx::FromRow)]
struct StockRow {
    id: Uuid,
    last_update: Option<String>,
    date: Option<String>,
    stock_type: Option<String>,
    bags: Option<f64>,
    weight: Option<f64>,
    car_no: Option<String>,
    party_name: Option<String>,
    unloader_name: Option<String>,
}

impl From<StockRow> for Stock {
    fn from(row: StockRow) -> Self {
        Stock {
            id: row.id,
            fields: StockFields {
                last_update: row.last_update,
                date: row.date,
                kind: row.stock_type,
                bags: row.bags,
                weight: row.weight,
                car_no: row.car_no,
                party_name: row.party_name,
                unloader_name: row.unloader_name,
            },
        }
    }
}

pub struct PgStockStore {
    pool: PgPool,
}

impl PgStockStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_ordered(&self, order_by: &str) -> Result<Vec<Stock>, StoreError> {
        let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks ORDER BY {order_by}");
        let rows = sqlx::query_as::<_, StockRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Stock::from).collect())
    }
}

#[async_trait]
impl StockStore for PgStockStore {
    async fn insert(&self, fields: StockFields) -> Result<Stock, StoreError> {
        let sql = format!(
            "INSERT INTO stocks ({STOCK_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {STOCK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StockRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&fields.last_update)
            .bind(&fields.date)
            .bind(&fields.kind)
            .bind(fields.bags)
            .bind(fields.weight)
            .bind(&fields.car_no)
            .bind(&fields.party_name)
            .bind(&fields.unloader_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Stock>, StoreError> {
        self.fetch_ordered("seq").await
    }

    async fn list_by_date_desc(&self) -> Result<Vec<Stock>, StoreError> {
        self.fetch_ordered(r#"date COLLATE "C" DESC NULLS LAST, seq"#).await
    }
}
