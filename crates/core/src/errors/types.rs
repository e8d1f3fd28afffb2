//! Core error type definitions

use crate::types::OperationKind;
use std::time::Duration;

/// Result type alias for wrapped cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type alias for raw store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure raised by an observer callback
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Failure raised by a cache store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached
    Unavailable { store: String, reason: String },

    /// The store did not answer in time
    Timeout {
        store: String,
        operation: OperationKind,
        duration: Duration,
    },

    /// A value could not be encoded or decoded
    Serialization {
        key: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any other backend failure
    Backend {
        store: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Failure of a wrapped cache operation.
///
/// One variant per operation kind, each carrying the originating store
/// failure together with the operation's arguments. `Observer` is only
/// produced when observer failures are configured to propagate.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    Get {
        store: String,
        key: String,
        #[source]
        source: StoreError,
    },

    Put {
        store: String,
        key: String,
        has_value: bool,
        #[source]
        source: StoreError,
    },

    Evict {
        store: String,
        key: String,
        #[source]
        source: StoreError,
    },

    Clear {
        store: String,
        #[source]
        source: StoreError,
    },

    Observer {
        observer: String,
        operation: OperationKind,
        #[source]
        source: ObserverError,
    },
}

/// Configuration parsing and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    Invalid { field: String, message: String },
}
