//! Observers notified after successful cache operations

use crate::config::ObserverFailureMode;
use cachewrap_core::{CacheError, CacheStore, ObserverError, OperationContext, OperationKind, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Listener notified after each successful store operation.
///
/// Observers are side effects only (metrics, auditing, secondary
/// invalidation); they see the operation's arguments but never its result.
/// Every callback defaults to a no-op so implementations only override the
/// operations they care about.
pub trait CacheObserver<K, V>: Send + Sync {
    /// Observer name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn after_get(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        let _ = (store, key, context);
        Ok(())
    }

    fn after_put(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        value: Option<&V>,
        context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        let _ = (store, key, value, context);
        Ok(())
    }

    fn after_evict(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        let _ = (store, key, context);
        Ok(())
    }

    fn after_clear(
        &self,
        store: &dyn CacheStore<K, V>,
        context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        let _ = (store, context);
        Ok(())
    }
}

/// Ordered, append-only list of observers
pub struct ObserverChain<K, V> {
    observers: Vec<Arc<dyn CacheObserver<K, V>>>,
    failure_mode: ObserverFailureMode,
}

impl<K, V> ObserverChain<K, V> {
    pub fn new(failure_mode: ObserverFailureMode) -> Self {
        Self {
            observers: Vec::new(),
            failure_mode,
        }
    }

    /// Append an observer; it will be notified after all earlier ones
    pub fn push(&mut self, observer: Arc<dyn CacheObserver<K, V>>) {
        debug!(
            observer = observer.name(),
            position = self.observers.len(),
            "Registered cache observer"
        );
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn failure_mode(&self) -> ObserverFailureMode {
        self.failure_mode
    }

    pub fn set_failure_mode(&mut self, failure_mode: ObserverFailureMode) {
        self.failure_mode = failure_mode;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CacheObserver<K, V>>> {
        self.observers.iter()
    }

    /// Registered observer names, in dispatch order
    pub fn names(&self) -> Vec<&str> {
        self.observers.iter().map(|observer| observer.name()).collect()
    }

    /// Call `callback` on every observer in registration order.
    ///
    /// In `Isolate` mode a failing observer is logged and skipped. In
    /// `Propagate` mode the first failure stops dispatch and is returned.
    pub fn notify<F>(&self, operation: OperationKind, mut callback: F) -> Result<()>
    where
        F: FnMut(&dyn CacheObserver<K, V>) -> std::result::Result<(), ObserverError>,
    {
        for observer in &self.observers {
            let name = observer.name();
            match callback(observer.as_ref()) {
                Ok(()) => {
                    debug!(observer = name, operation = %operation, "Observer notified");
                }
                Err(e) => match self.failure_mode {
                    ObserverFailureMode::Isolate => {
                        warn!(
                            observer = name,
                            operation = %operation,
                            error = %e,
                            "Cache observer failed, continuing"
                        );
                    }
                    ObserverFailureMode::Propagate => {
                        return Err(CacheError::observer(name, operation, e));
                    }
                },
            }
        }
        Ok(())
    }
}

impl<K, V> Default for ObserverChain<K, V> {
    fn default() -> Self {
        Self::new(ObserverFailureMode::default())
    }
}

impl<K, V> fmt::Debug for ObserverChain<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverChain")
            .field("observers", &self.names())
            .field("failure_mode", &self.failure_mode)
            .finish()
    }
}
