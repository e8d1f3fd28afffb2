//! Correlation data passed through the invoker to observers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Describes the call a cache operation was made on behalf of.
///
/// The invoker never reads or changes a context; it only hands the same
/// reference to every observer so that they can attribute the operation
/// (to an application, a class, a cached method) and correlate events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    id: Uuid,
    operation: String,
    app_name: Option<String>,
    class_name: Option<String>,
    cache_names: Vec<String>,
    metadata: BTreeMap<String, String>,
}

impl OperationContext {
    /// Create a context for the named cached operation (usually a method signature)
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation: operation.into(),
            app_name: None,
            class_name: None,
            cache_names: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn with_cache_name(mut self, cache_name: impl Into<String>) -> Self {
        self.cache_names.push(cache_name.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn cache_names(&self) -> &[String] {
        &self.cache_names
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
