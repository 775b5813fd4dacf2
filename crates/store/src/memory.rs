//! In-memory collections backed by `tokio::sync` locks.
//!
//! Used for local runs (`STORAGE_BACKEND=memory`) and by the HTTP tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use paddy_core::{CarArrival, CarArrivalUpdate, Scan, Stock, StockFields};

use crate::collection::{CarArrivalStore, ScanStore, StockStore};
use crate::error::StoreError;

// ── Car arrivals ─────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCarArrivalStore {
    current: Mutex<Option<CarArrival>>,
}

#[async_trait]
impl CarArrivalStore for MemoryCarArrivalStore {
    async fn latest(&self) -> Result<Option<CarArrival>, StoreError> {
        Ok(self.current.lock().await.clone())
    }

    async fn replace(&self, update: CarArrivalUpdate) -> Result<CarArrival, StoreError> {
        // Held across the whole read-modify-write.
        let mut current = self.current.lock().await;
        let now = Utc::now();

        let record = match current.take() {
            Some(mut record) => {
                record.history = update.history;
                record.logs = update.logs;
                record.timestamp = now;
                record.updated_at = now;
                record
            }
            None => CarArrival {
                id: Uuid::new_v4(),
                timestamp: now,
                history: update.history,
                logs: update.logs,
                created_at: now,
                updated_at: now,
            },
        };

        *current = Some(record.clone());
        Ok(record)
    }
}

// ── Scans ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryScanStore {
    scans: RwLock<Vec<Scan>>,
}

#[async_trait]
impl ScanStore for MemoryScanStore {
    async fn insert(&self, fields: Map<String, Value>) -> Result<Scan, StoreError> {
        let scan = Scan {
            id: Uuid::new_v4(),
            fields,
        };
        self.scans.write().await.push(scan.clone());
        Ok(scan)
    }

    async fn list_newest_first(&self) -> Result<Vec<Scan>, StoreError> {
        Ok(self.scans.read().await.iter().rev().cloned().collect())
    }
}

// ── Stock ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStockStore {
    stocks: RwLock<Vec<Stock>>,
}

#[async_trait]
impl StockStore for MemoryStockStore {
    async fn insert(&self, fields: StockFields) -> Result<Stock, StoreError> {
        let stock = Stock {
            id: Uuid::new_v4(),
            fields,
        };
        self.stocks.write().await.push(stock.clone());
        Ok(stock)
    }

    async fn list(&self) -> Result<Vec<Stock>, StoreError> {
        Ok(self.stocks.read().await.clone())
    }

    async fn list_by_date_desc(&self) -> Result<Vec<Stock>, StoreError> {
        let mut stocks = self.stocks.read().await.clone();
        sort_by_date_desc(&mut stocks);
        Ok(stocks)
    }
}

/// Byte-wise descending on `Date`, missing dates last. Stable, so equal dates
/// keep insertion order.
pub fn sort_by_date_desc(stocks: &mut [Stock]) {
    stocks.sort_by(|a, b| match (&a.fields.date, &b.fields.date) {
        (Some(x), Some(y)) => y.as_bytes().cmp(x.as_bytes()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
