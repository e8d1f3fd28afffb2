//! The cache operation invoker

use crate::config::InvokerConfig;
use crate::observer::{CacheObserver, ObserverChain};
use crate::policy::{ErrorPolicy, LoggingErrorPolicy, PropagatingErrorPolicy};
use cachewrap_core::{CacheError, CacheStore, Lookup, OperationContext, OperationKind, Result};
use std::fmt::{self, Debug};
use std::sync::Arc;
use tracing::debug;

/// Runs cache operations against a store, routing failures to an
/// [`ErrorPolicy`] and successes to an [`ObserverChain`].
///
/// Each wrapped operation makes exactly one store call. On success every
/// observer is notified in registration order; on failure only the matching
/// policy handler runs and no observer is notified. The invoker holds no
/// locks, so the store, policy and observers must be safe to share.
pub struct CacheInvoker<K, V> {
    error_policy: Box<dyn ErrorPolicy<K, V>>,
    observers: ObserverChain<K, V>,
}

impl<K: Debug, V> CacheInvoker<K, V> {
    /// Create an invoker that propagates every store failure
    pub fn new() -> Self {
        Self::with_error_policy(PropagatingErrorPolicy)
    }

    pub fn with_error_policy(policy: impl ErrorPolicy<K, V> + 'static) -> Self {
        Self {
            error_policy: Box::new(policy),
            observers: ObserverChain::default(),
        }
    }

    /// Build an invoker from configuration. An empty swallow list keeps the
    /// propagating default; otherwise a [`LoggingErrorPolicy`] is installed.
    pub fn from_config(config: &InvokerConfig) -> Self {
        let mut invoker = if config.error_policy.swallow.is_empty() {
            Self::new()
        } else {
            Self::with_error_policy(LoggingErrorPolicy::from_config(&config.error_policy))
        };
        invoker
            .observers
            .set_failure_mode(config.observer_failure);
        invoker
    }

    /// Replace the error policy
    pub fn set_error_policy(&mut self, policy: impl ErrorPolicy<K, V> + 'static) {
        self.error_policy = Box::new(policy);
    }

    pub fn error_policy(&self) -> &dyn ErrorPolicy<K, V> {
        self.error_policy.as_ref()
    }

    /// Register an observer after all previously registered ones
    pub fn add_observer(&mut self, observer: Arc<dyn CacheObserver<K, V>>) {
        self.observers.push(observer);
    }

    pub fn observers(&self) -> &ObserverChain<K, V> {
        &self.observers
    }

    pub fn observers_mut(&mut self) -> &mut ObserverChain<K, V> {
        &mut self.observers
    }

    /// Read `key` from `store`.
    ///
    /// A failure swallowed by the policy is reported as [`Lookup::Miss`], so
    /// callers treat recoverable read failures exactly like a cache miss.
    pub fn get(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        context: &OperationContext,
    ) -> Result<Lookup<V>> {
        let span = tracing::debug_span!("cache_operation", operation = "get", store = store.name());
        let _guard = span.enter();

        match store.get(key) {
            Ok(lookup) => {
                debug!(key = ?key, hit = lookup.is_hit(), "Cache get completed");
                self.observers
                    .notify(OperationKind::Get, |observer| {
                        observer.after_get(store, key, context)
                    })?;
                Ok(lookup)
            }
            Err(source) => {
                let error = CacheError::get(store.name(), key, source);
                self.error_policy.handle_get_error(error, store, key)?;
                debug!(key = ?key, "Cache get failure swallowed, reporting a miss");
                Ok(Lookup::Miss)
            }
        }
    }

    /// Write `value` under `key`; `None` caches an explicit null
    pub fn put(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        value: Option<&V>,
        context: &OperationContext,
    ) -> Result<()> {
        let span = tracing::debug_span!("cache_operation", operation = "put", store = store.name());
        let _guard = span.enter();

        match store.put(key, value) {
            Ok(()) => {
                debug!(key = ?key, null = value.is_none(), "Cache put completed");
                self.observers.notify(OperationKind::Put, |observer| {
                    observer.after_put(store, key, value, context)
                })
            }
            Err(source) => {
                let error = CacheError::put(store.name(), key, value.is_some(), source);
                self.error_policy.handle_put_error(error, store, key, value)?;
                debug!(key = ?key, "Cache put failure swallowed");
                Ok(())
            }
        }
    }

    /// Remove `key` from `store`
    pub fn evict(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        context: &OperationContext,
    ) -> Result<()> {
        let span =
            tracing::debug_span!("cache_operation", operation = "evict", store = store.name());
        let _guard = span.enter();

        match store.evict(key) {
            Ok(()) => {
                debug!(key = ?key, "Cache evict completed");
                self.observers.notify(OperationKind::Evict, |observer| {
                    observer.after_evict(store, key, context)
                })
            }
            Err(source) => {
                let error = CacheError::evict(store.name(), key, source);
                self.error_policy.handle_evict_error(error, store, key)?;
                debug!(key = ?key, "Cache evict failure swallowed");
                Ok(())
            }
        }
    }

    /// Remove every entry from `store`
    pub fn clear(&self, store: &dyn CacheStore<K, V>, context: &OperationContext) -> Result<()> {
        let span =
            tracing::debug_span!("cache_operation", operation = "clear", store = store.name());
        let _guard = span.enter();

        match store.clear() {
            Ok(()) => {
                debug!("Cache clear completed");
                self.observers.notify(OperationKind::Clear, |observer| {
                    observer.after_clear(store, context)
                })
            }
            Err(source) => {
                let error = CacheError::clear(store.name(), source);
                self.error_policy.handle_clear_error(error, store)?;
                debug!("Cache clear failure swallowed");
                Ok(())
            }
        }
    }
}

impl<K: Debug, V> Default for CacheInvoker<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for CacheInvoker<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheInvoker")
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
