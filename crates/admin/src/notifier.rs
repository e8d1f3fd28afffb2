//! Project-level invalidation triggered from the management surface

use crate::errors::{AdminError, Result};
use crate::model::CacheEntryView;
use cachewrap_core::{CacheStore, OperationContext};
use cachewrap_invoker::CacheInvoker;
use std::sync::Arc;
use tracing::{debug, warn};

/// Operation name carried by contexts of admin-initiated evictions
pub const ADMIN_REMOVE_OPERATION: &str = "cache-admin.remove";

/// Invalidates cached keys on behalf of operators
pub trait InvalidationNotifier: Send + Sync {
    /// Invalidate `key` wherever `app_name` caches it
    fn notify_evict(&self, key: &str, app_name: &str) -> Result<()>;

    /// Invalidate a single catalog entry. Defaults to a key-wide invalidation.
    fn notify_removed(&self, entry: &CacheEntryView) -> Result<()> {
        self.notify_evict(&entry.cache_key, &entry.app_name)
    }
}

/// Evicts through a [`CacheInvoker`], so the invoker's error policy and
/// observers (a catalog, audit hooks) see admin removals like any other evict.
pub struct StoreInvalidator<V> {
    invoker: Arc<CacheInvoker<String, V>>,
    stores: Vec<Arc<dyn CacheStore<String, V>>>,
}

impl<V> StoreInvalidator<V> {
    pub fn new(invoker: Arc<CacheInvoker<String, V>>) -> Self {
        Self {
            invoker,
            stores: Vec::new(),
        }
    }

    /// Add a store that key-wide invalidations evict from
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CacheStore<String, V>>) -> Self {
        self.stores.push(store);
        self
    }

    fn evict_from(&self, store: &dyn CacheStore<String, V>, key: &str, app_name: &str) -> Result<()> {
        let context = OperationContext::new(ADMIN_REMOVE_OPERATION).with_app_name(app_name);
        self.invoker
            .evict(store, &key.to_string(), &context)
            .map_err(|e| AdminError::invalidation(key, e))
    }
}

impl<V> InvalidationNotifier for StoreInvalidator<V> {
    /// Evicts from every store even if some fail; the first failure is returned
    fn notify_evict(&self, key: &str, app_name: &str) -> Result<()> {
        let mut first_error = None;
        for store in &self.stores {
            if let Err(e) = self.evict_from(store.as_ref(), key, app_name) {
                warn!(key = key, store = store.name(), error = %e, "Failed to invalidate cache key");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                debug!(key = key, stores = self.stores.len(), "Invalidated cache key");
                Ok(())
            }
        }
    }

    fn notify_removed(&self, entry: &CacheEntryView) -> Result<()> {
        match self
            .stores
            .iter()
            .find(|store| store.name() == entry.cache_name)
        {
            Some(store) => self.evict_from(store.as_ref(), &entry.cache_key, &entry.app_name),
            None => {
                debug!(
                    cache_name = %entry.cache_name,
                    cache_key = %entry.cache_key,
                    "No store registered for removed entry"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachewrap_invoker::testing::{EventLog, MemoryStore, RecordingObserver};
    use cachewrap_invoker::{LoggingErrorPolicy, OperationKind};
    use chrono::Utc;

    fn entry(cache_name: &str, key: &str) -> CacheEntryView {
        CacheEntryView {
            app_name: "shop".to_string(),
            class_name: None,
            method_name: "m".to_string(),
            cache_name: cache_name.to_string(),
            cache_key: key.to_string(),
            created_at: Utc::now(),
            reads: 0,
        }
    }

    #[test]
    fn key_wide_invalidation_evicts_from_every_store() {
        let users = Arc::new(MemoryStore::<String, u32>::new("users"));
        let orders = Arc::new(MemoryStore::<String, u32>::new("orders"));
        users.insert("k".to_string(), Some(1));
        orders.insert("k".to_string(), Some(2));
        let log = EventLog::default();
        let mut invoker: CacheInvoker<String, u32> = CacheInvoker::new();
        invoker.add_observer(Arc::new(RecordingObserver::new("audit", log.clone())));

        let notifier = StoreInvalidator::new(Arc::new(invoker))
            .with_store(users.clone())
            .with_store(orders.clone());
        notifier.notify_evict("k", "shop").unwrap();

        assert!(users.is_empty());
        assert!(orders.is_empty());
        let stores: Vec<_> = log.events().into_iter().map(|e| e.store).collect();
        assert_eq!(stores, vec!["users", "orders"]);
    }

    #[test]
    fn entry_invalidation_targets_its_store() {
        let users = Arc::new(MemoryStore::<String, u32>::new("users"));
        let orders = Arc::new(MemoryStore::<String, u32>::new("orders"));
        users.insert("k".to_string(), Some(1));
        orders.insert("k".to_string(), Some(2));
        let invoker: CacheInvoker<String, u32> = CacheInvoker::new();

        let notifier = StoreInvalidator::new(Arc::new(invoker))
            .with_store(users.clone())
            .with_store(orders.clone());
        notifier.notify_removed(&entry("orders", "k")).unwrap();
        notifier.notify_removed(&entry("unknown", "k")).unwrap();

        assert_eq!(users.len(), 1);
        assert!(orders.is_empty());
    }

    #[test]
    fn eviction_failures_follow_the_invoker_policy() {
        let users = Arc::new(MemoryStore::<String, u32>::new("users"));
        users.fail_on(OperationKind::Evict);

        let strict = StoreInvalidator::new(Arc::new(CacheInvoker::<String, u32>::new()))
            .with_store(users.clone());
        let err = strict.notify_evict("k", "shop").unwrap_err();
        assert!(matches!(err, AdminError::Invalidation { ref key, .. } if key == "k"));

        let lenient = StoreInvalidator::new(Arc::new(CacheInvoker::<String, u32>::with_error_policy(
            LoggingErrorPolicy::swallowing([OperationKind::Evict]),
        )))
        .with_store(users.clone());
        assert!(lenient.notify_evict("k", "shop").is_ok());
    }

    #[test]
    fn a_failing_store_does_not_block_the_others() {
        let users = Arc::new(MemoryStore::<String, u32>::new("users"));
        let orders = Arc::new(MemoryStore::<String, u32>::new("orders"));
        users.insert("k".to_string(), Some(1));
        orders.insert("k".to_string(), Some(2));
        users.fail_on(OperationKind::Evict);

        let notifier = StoreInvalidator::new(Arc::new(CacheInvoker::<String, u32>::new()))
            .with_store(users.clone())
            .with_store(orders.clone());
        let err = notifier.notify_evict("k", "shop").unwrap_err();

        assert!(matches!(err, AdminError::Invalidation { ref key, .. } if key == "k"));
        assert!(users.contains(&"k".to_string()));
        assert!(!orders.contains(&"k".to_string()));
        assert_eq!(orders.calls(OperationKind::Evict), 1);
    }
}
