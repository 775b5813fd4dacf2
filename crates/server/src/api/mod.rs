//! HTTP endpoint modules, one per collection.
//!
//! Shared error and body types live in `error` and `payload`.

mod car_arrival;
pub mod doc;
mod error;
mod health;
mod payload;
mod scans;
mod stocks;

pub use error::{ApiError, ErrorResponse, MessageResponse};
pub use payload::Payload;

// ── Re-exports ───────────────────────────────────────────────────
// Flat `api::foo` paths used by the router.

pub use car_arrival::{car_arrival_get, car_arrival_post};
pub use health::root;
pub use scans::{scans_create, scans_list};
pub use stocks::{stocks_all, stocks_create, stocks_daily};
