//! Errors raised by the management surface

use cachewrap_core::{CacheError, ConfigError};
use std::fmt;

/// Result type alias for management operations
pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// A request was missing a required field or carried an invalid one
    InvalidRequest { field: String, message: String },

    /// The catalog backend failed
    Catalog {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalidating a key failed
    Invalidation {
        key: String,
        #[source]
        source: CacheError,
    },

    /// A response could not be rendered
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    Config {
        #[source]
        source: ConfigError,
    },
}

impl AdminError {
    #[must_use]
    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        AdminError::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn catalog(message: impl Into<String>) -> Self {
        AdminError::Catalog {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn invalidation(key: impl Into<String>, source: CacheError) -> Self {
        AdminError::Invalidation {
            key: key.into(),
            source,
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::InvalidRequest { field, message } => {
                write!(f, "invalid request field '{field}': {message}")
            }
            AdminError::Catalog { message, .. } => write!(f, "cache catalog error: {message}"),
            AdminError::Invalidation { key, source } => {
                write!(f, "failed to invalidate cache key '{key}': {source}")
            }
            AdminError::Serialization { source } => {
                write!(f, "failed to render response: {source}")
            }
            AdminError::Config { source } => write!(f, "{source}"),
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(source: serde_json::Error) -> Self {
        AdminError::Serialization { source }
    }
}

impl From<ConfigError> for AdminError {
    fn from(source: ConfigError) -> Self {
        AdminError::Config { source }
    }
}
