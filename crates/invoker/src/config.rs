//! Invoker configuration with defaults and a builder
use cachewrap_core::{ConfigError, OperationKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What the observer chain does when a callback fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserverFailureMode {
    /// Log the failure and keep notifying the remaining observers
    #[default]
    Isolate,
    /// Stop at the failing observer and fail the wrapped operation
    Propagate,
}

/// Level at which swallowed store errors are logged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

/// Error policy settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorPolicyConfig {
    /// Operations whose store failures are logged and swallowed.
    /// Empty means every failure propagates.
    pub swallow: BTreeSet<OperationKind>,
    /// Level used when logging a swallowed failure
    pub log_level: LogLevel,
}

/// Top-level invoker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    pub observer_failure: ObserverFailureMode,
    pub error_policy: ErrorPolicyConfig,
}

impl InvokerConfig {
    /// Parse a configuration document, e.g.
    /// `{"observer_failure": "propagate", "error_policy": {"swallow": ["get"]}}`
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: InvokerConfig = serde_json::from_str(document)?;
        Ok(config)
    }

    pub fn builder() -> InvokerConfigBuilder {
        InvokerConfigBuilder::new()
    }
}

/// Builder for creating invoker configurations
#[derive(Debug, Default)]
pub struct InvokerConfigBuilder {
    config: InvokerConfig,
}

impl InvokerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how observer failures are treated
    pub fn with_observer_failure(mut self, mode: ObserverFailureMode) -> Self {
        self.config.observer_failure = mode;
        self
    }

    /// Swallow store failures of the given operation
    pub fn swallow(mut self, operation: OperationKind) -> Self {
        self.config.error_policy.swallow.insert(operation);
        self
    }

    /// Set the level swallowed failures are logged at
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.error_policy.log_level = level;
        self
    }

    pub fn build(self) -> InvokerConfig {
        self.config
    }
}
