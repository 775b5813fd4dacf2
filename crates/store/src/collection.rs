//! Collection traits and the per-process bundle of store handles.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use paddy_core::{CarArrival, CarArrivalUpdate, Scan, Stock, StockFields};

use crate::error::StoreError;
use crate::memory::{MemoryCarArrivalStore, MemoryScanStore, MemoryStockStore};
use crate::postgres::{PgCarArrivalStore, PgPools, PgScanStore, PgStockStore};

/// The car-arrival collection holds at most one current record.
#[async_trait]
pub trait CarArrivalStore: Send + Sync {
    /// Fetch the current record, if one has ever been written.
    async fn latest(&self) -> Result<Option<CarArrival>, StoreError>;

    /// Overwrite `history` and `logs` of the current record, creating it on
    /// first use. Concurrent callers never lose the record; the last write
    /// wins.
    async fn replace(&self, update: CarArrivalUpdate) -> Result<CarArrival, StoreError>;
}

#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn insert(&self, fields: Map<String, Value>) -> Result<Scan, StoreError>;

    /// All scans, most recently inserted first.
    async fn list_newest_first(&self) -> Result<Vec<Scan>, StoreError>;
}

#[async_trait]
pub trait StockStore: Send + Sync {
    async fn insert(&self, fields: StockFields) -> Result<Stock, StoreError>;

    /// All stock records in insertion order.
    async fn list(&self) -> Result<Vec<Stock>, StoreError>;

    /// All stock records sorted by the `Date` text, descending and byte-wise.
    /// Records without a date come last; ties keep insertion order.
    async fn list_by_date_desc(&self) -> Result<Vec<Stock>, StoreError>;
}

/// One handle per collection, shared by all request handlers.
#[derive(Clone)]
pub struct Stores {
    pub car: Arc<dyn CarArrivalStore>,
    pub scans: Arc<dyn ScanStore>,
    pub stocks: Arc<dyn StockStore>,
}

impl Stores {
    /// Process-local stores; nothing survives a restart.
    pub fn memory() -> Self {
        Self {
            car: Arc::new(MemoryCarArrivalStore::default()),
            scans: Arc::new(MemoryScanStore::default()),
            stocks: Arc::new(MemoryStockStore::default()),
        }
    }

    /// PostgreSQL-backed stores, one pool per collection.
    pub fn postgres(pools: &PgPools) -> Self {
        Self {
            car: Arc::new(PgCarArrivalStore::new(pools.car.clone())),
            scans: Arc::new(PgScanStore::new(pools.qr.clone())),
            stocks: Arc::new(PgStockStore::new(pools.stock.clone())),
        }
    }
}
