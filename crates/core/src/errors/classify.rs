//! Classification helpers for cache errors

use super::types::{CacheError, StoreError};
use crate::types::OperationKind;

impl StoreError {
    /// Check if this failure is likely to clear up on its own
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable { .. } | StoreError::Timeout { .. }
        )
    }
}

impl CacheError {
    /// The operation that failed
    #[must_use]
    pub const fn operation(&self) -> OperationKind {
        match self {
            CacheError::Get { .. } => OperationKind::Get,
            CacheError::Put { .. } => OperationKind::Put,
            CacheError::Evict { .. } => OperationKind::Evict,
            CacheError::Clear { .. } => OperationKind::Clear,
            CacheError::Observer { operation, .. } => *operation,
        }
    }

    /// Name of the store involved, if the failure came from a store
    #[must_use]
    pub fn store(&self) -> Option<&str> {
        match self {
            CacheError::Get { store, .. }
            | CacheError::Put { store, .. }
            | CacheError::Evict { store, .. }
            | CacheError::Clear { store, .. } => Some(store),
            CacheError::Observer { .. } => None,
        }
    }

    /// The originating store failure, if any
    #[must_use]
    pub const fn store_error(&self) -> Option<&StoreError> {
        match self {
            CacheError::Get { source, .. }
            | CacheError::Put { source, .. }
            | CacheError::Evict { source, .. }
            | CacheError::Clear { source, .. } => Some(source),
            CacheError::Observer { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_observer_failure(&self) -> bool {
        matches!(self, CacheError::Observer { .. })
    }

    /// Check if the underlying store failure is transient
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self.store_error() {
            Some(source) => source.is_transient(),
            None => false,
        }
    }
}
