//! Document store adapter for the three collections.
//!
//! Each collection sits behind its own trait so handlers never know which
//! backend is live. [`Stores`] bundles one handle per collection.

pub mod collection;
pub mod error;
pub mod memory;
pub mod postgres;

pub use collection::{CarArrivalStore, ScanStore, StockStore, Stores};
pub use error::StoreError;
