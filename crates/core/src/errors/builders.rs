//! Builder methods for creating errors with context

use super::types::{CacheError, ConfigError, ObserverError, StoreError};
use crate::types::OperationKind;
use std::fmt::Debug;
use std::time::Duration;

impl StoreError {
    #[must_use]
    pub fn unavailable(store: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            store: store.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn timeout(store: impl Into<String>, operation: OperationKind, duration: Duration) -> Self {
        StoreError::Timeout {
            store: store.into(),
            operation,
            duration,
        }
    }

    #[must_use]
    pub fn serialization(key: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Serialization {
            key: key.into(),
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn backend(store: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Backend {
            store: store.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a backend error wrapping the driver's own error
    #[must_use]
    pub fn backend_with_source(
        store: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        StoreError::Backend {
            store: store.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl CacheError {
    /// Wrap a failed `get`
    #[must_use]
    pub fn get<K: Debug + ?Sized>(store: impl Into<String>, key: &K, source: StoreError) -> Self {
        CacheError::Get {
            store: store.into(),
            key: format!("{key:?}"),
            source,
        }
    }

    /// Wrap a failed `put`
    #[must_use]
    pub fn put<K: Debug + ?Sized>(
        store: impl Into<String>,
        key: &K,
        has_value: bool,
        source: StoreError,
    ) -> Self {
        CacheError::Put {
            store: store.into(),
            key: format!("{key:?}"),
            has_value,
            source,
        }
    }

    /// Wrap a failed `evict`
    #[must_use]
    pub fn evict<K: Debug + ?Sized>(store: impl Into<String>, key: &K, source: StoreError) -> Self {
        CacheError::Evict {
            store: store.into(),
            key: format!("{key:?}"),
            source,
        }
    }

    /// Wrap a failed `clear`
    #[must_use]
    pub fn clear(store: impl Into<String>, source: StoreError) -> Self {
        CacheError::Clear {
            store: store.into(),
            source,
        }
    }

    /// Wrap a failing observer callback
    #[must_use]
    pub fn observer(
        observer: impl Into<String>,
        operation: OperationKind,
        source: ObserverError,
    ) -> Self {
        CacheError::Observer {
            observer: observer.into(),
            operation,
            source,
        }
    }
}

impl ConfigError {
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}
