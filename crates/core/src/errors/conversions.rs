//! Conversion implementations for error types

use super::types::ConfigError;

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json {
            message: error.to_string(),
            source: error,
        }
    }
}
