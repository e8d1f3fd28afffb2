//! Error policies deciding whether a store failure is swallowed or propagated

use crate::config::{ErrorPolicyConfig, LogLevel};
use cachewrap_core::{CacheError, CacheStore, OperationKind, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Decides the fate of a failed store call.
///
/// Each handler receives the failure together with the store and the
/// arguments of the operation. Returning `Ok(())` swallows the failure
/// (a failed get then reads as a miss); returning `Err` propagates it to
/// the caller of the wrapped operation. Every handler re-raises by default.
pub trait ErrorPolicy<K, V>: Send + Sync {
    fn handle_get_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        key: &K,
    ) -> Result<()> {
        let _ = (store, key);
        Err(error)
    }

    fn handle_put_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        key: &K,
        value: Option<&V>,
    ) -> Result<()> {
        let _ = (store, key, value);
        Err(error)
    }

    fn handle_evict_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        key: &K,
    ) -> Result<()> {
        let _ = (store, key);
        Err(error)
    }

    fn handle_clear_error(&self, error: CacheError, store: &dyn CacheStore<K, V>) -> Result<()> {
        let _ = store;
        Err(error)
    }
}

/// Re-raises every failure unchanged. This is the invoker's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagatingErrorPolicy;

impl<K, V> ErrorPolicy<K, V> for PropagatingErrorPolicy {}

/// Logs and swallows failures of selected operations, propagating the rest
#[derive(Debug, Clone, Default)]
pub struct LoggingErrorPolicy {
    swallow: BTreeSet<OperationKind>,
    level: LogLevel,
}

impl LoggingErrorPolicy {
    /// Swallow failures of the given operations
    pub fn swallowing(operations: impl IntoIterator<Item = OperationKind>) -> Self {
        Self {
            swallow: operations.into_iter().collect(),
            level: LogLevel::default(),
        }
    }

    /// Swallow failures of every operation
    pub fn swallow_all() -> Self {
        Self::swallowing(OperationKind::ALL)
    }

    pub fn from_config(config: &ErrorPolicyConfig) -> Self {
        Self {
            swallow: config.swallow.clone(),
            level: config.log_level,
        }
    }

    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn swallows(&self, operation: OperationKind) -> bool {
        self.swallow.contains(&operation)
    }

    fn decide(&self, error: CacheError, store: &str) -> Result<()> {
        let operation = error.operation();
        if !self.swallows(operation) {
            return Err(error);
        }

        match self.level {
            LogLevel::Error => {
                error!(store = store, operation = %operation, error = %error, "Swallowed cache error")
            }
            LogLevel::Warn => {
                warn!(store = store, operation = %operation, error = %error, "Swallowed cache error")
            }
            LogLevel::Info => {
                info!(store = store, operation = %operation, error = %error, "Swallowed cache error")
            }
            LogLevel::Debug => {
                debug!(store = store, operation = %operation, error = %error, "Swallowed cache error")
            }
        }
        Ok(())
    }
}

impl<K, V> ErrorPolicy<K, V> for LoggingErrorPolicy {
    fn handle_get_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        _key: &K,
    ) -> Result<()> {
        self.decide(error, store.name())
    }

    fn handle_put_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        _key: &K,
        _value: Option<&V>,
    ) -> Result<()> {
        self.decide(error, store.name())
    }

    fn handle_evict_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        _key: &K,
    ) -> Result<()> {
        self.decide(error, store.name())
    }

    fn handle_clear_error(&self, error: CacheError, store: &dyn CacheStore<K, V>) -> Result<()> {
        self.decide(error, store.name())
    }
}

/// A shared policy, so callers can keep a handle to a stateful one
impl<K, V, P> ErrorPolicy<K, V> for Arc<P>
where
    P: ErrorPolicy<K, V> + ?Sized,
{
    fn handle_get_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        key: &K,
    ) -> Result<()> {
        (**self).handle_get_error(error, store, key)
    }

    fn handle_put_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        key: &K,
        value: Option<&V>,
    ) -> Result<()> {
        (**self).handle_put_error(error, store, key, value)
    }

    fn handle_evict_error(
        &self,
        error: CacheError,
        store: &dyn CacheStore<K, V>,
        key: &K,
    ) -> Result<()> {
        (**self).handle_evict_error(error, store, key)
    }

    fn handle_clear_error(&self, error: CacheError, store: &dyn CacheStore<K, V>) -> Result<()> {
        (**self).handle_clear_error(error, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use cachewrap_core::StoreError;

    const STORE: &str = "policy-test";

    fn store() -> MemoryStore<String, u32> {
        MemoryStore::new(STORE)
    }

    fn failure() -> StoreError {
        StoreError::backend(STORE, "boom")
    }

    #[test]
    fn propagating_policy_returns_the_same_error() {
        let store = store();
        let key = "k".to_string();
        let policy: &dyn ErrorPolicy<String, u32> = &PropagatingErrorPolicy;

        let returned = policy
            .handle_get_error(CacheError::get(STORE, &key, failure()), &store, &key)
            .unwrap_err();
        match returned {
            CacheError::Get {
                store: name,
                key: rendered,
                source,
            } => {
                assert_eq!(name, STORE);
                assert_eq!(rendered, "\"k\"");
                assert!(source.to_string().contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn propagating_policy_re_raises_every_operation() {
        let store = store();
        let key = "k".to_string();
        let policy: &dyn ErrorPolicy<String, u32> = &PropagatingErrorPolicy;

        assert!(policy
            .handle_put_error(CacheError::put(STORE, &key, true, failure()), &store, &key, Some(&1))
            .is_err());
        assert!(policy
            .handle_evict_error(CacheError::evict(STORE, &key, failure()), &store, &key)
            .is_err());
        assert!(policy
            .handle_clear_error(CacheError::clear(STORE, failure()), &store)
            .is_err());
    }

    #[test]
    fn logging_policy_swallows_only_configured_operations() {
        let store = store();
        let key = "k".to_string();
        let logging = LoggingErrorPolicy::swallowing([OperationKind::Get, OperationKind::Evict]);
        let policy: &dyn ErrorPolicy<String, u32> = &logging;

        assert!(policy
            .handle_get_error(CacheError::get(STORE, &key, failure()), &store, &key)
            .is_ok());
        assert!(policy
            .handle_evict_error(CacheError::evict(STORE, &key, failure()), &store, &key)
            .is_ok());
        assert!(policy
            .handle_put_error(CacheError::put(STORE, &key, true, failure()), &store, &key, Some(&1))
            .is_err());
        assert!(policy
            .handle_clear_error(CacheError::clear(STORE, failure()), &store)
            .is_err());
    }

    #[test]
    fn logging_policy_from_config() {
        let config = ErrorPolicyConfig {
            swallow: [OperationKind::Clear].into_iter().collect(),
            log_level: LogLevel::Debug,
        };
        let policy = LoggingErrorPolicy::from_config(&config);
        assert!(policy.swallows(OperationKind::Clear));
        assert!(!policy.swallows(OperationKind::Get));

        let all = LoggingErrorPolicy::swallow_all().with_log_level(LogLevel::Error);
        assert!(OperationKind::ALL.iter().all(|op| all.swallows(*op)));
    }
}
