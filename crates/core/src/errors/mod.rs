//! Error types for store failures and wrapped cache operations

mod builders;
mod classify;
mod conversions;
mod display;
mod types;

pub use types::{CacheError, ConfigError, ObserverError, Result, StoreError, StoreResult};
