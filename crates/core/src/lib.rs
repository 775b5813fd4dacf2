pub mod config;
pub mod daily;
pub mod error;
pub mod record;

pub use config::Config;
pub use daily::{daily_volume, DailyVolume};
pub use error::*;
pub use record::*;
