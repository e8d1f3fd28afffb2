//! Display implementations for error types

use super::types::{CacheError, ConfigError, StoreError};
use std::fmt;

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable { store, reason } => {
                write!(f, "cache store '{store}' is unavailable: {reason}")
            }
            StoreError::Timeout {
                store,
                operation,
                duration,
            } => {
                write!(
                    f,
                    "cache store '{store}' timed out during {operation} after {duration:?}"
                )
            }
            StoreError::Serialization { key, message, .. } => {
                write!(f, "failed to serialize cache value for key {key}: {message}")
            }
            StoreError::Backend { store, message, .. } => {
                write!(f, "cache store '{store}' failed: {message}")
            }
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Get { store, key, source } => {
                write!(f, "cache get failed on '{store}' for key {key}: {source}")
            }
            CacheError::Put {
                store,
                key,
                has_value,
                source,
            } => {
                if *has_value {
                    write!(f, "cache put failed on '{store}' for key {key}: {source}")
                } else {
                    write!(
                        f,
                        "cache put of null failed on '{store}' for key {key}: {source}"
                    )
                }
            }
            CacheError::Evict { store, key, source } => {
                write!(f, "cache evict failed on '{store}' for key {key}: {source}")
            }
            CacheError::Clear { store, source } => {
                write!(f, "cache clear failed on '{store}': {source}")
            }
            CacheError::Observer {
                observer,
                operation,
                source,
            } => {
                write!(
                    f,
                    "cache observer '{observer}' failed after {operation}: {source}"
                )
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json { message, .. } => {
                write!(f, "invalid configuration document: {message}")
            }
            ConfigError::Invalid { field, message } => {
                write!(f, "invalid configuration value for '{field}': {message}")
            }
        }
    }
}
