//! Catalog of cached entries that the management surface browses

use crate::errors::Result;
use crate::model::{CacheEntryView, PageInfo, PageRequest, SearchParam};
use cachewrap_core::{CacheStore, ObserverError, OperationContext};
use cachewrap_invoker::CacheObserver;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::debug;

/// Listing, search and bulk removal over recorded cache entries.
///
/// All queries are scoped to one application. Results are ordered by
/// class name, then cache name, then key.
pub trait CacheCatalog: Send + Sync {
    fn all(&self, app_name: &str, page: PageRequest) -> Result<PageInfo<CacheEntryView>>;

    fn search(
        &self,
        param: &SearchParam,
        app_name: &str,
        page: PageRequest,
    ) -> Result<PageInfo<CacheEntryView>>;

    /// Remove the entries written on behalf of `class_name`, optionally only
    /// the one with exactly `cache_key`. Returns what was removed.
    fn remove_class_name(
        &self,
        class_name: &str,
        cache_key: Option<&str>,
        app_name: &str,
    ) -> Result<Vec<CacheEntryView>>;

    /// Remove the entries of the cache `cache_name`, optionally only the one
    /// with exactly `cache_key`. Returns what was removed.
    fn remove_cache_name(
        &self,
        cache_name: &str,
        cache_key: Option<&str>,
        app_name: &str,
    ) -> Result<Vec<CacheEntryView>>;

    /// Put back entries whose invalidation failed after they were removed.
    /// An entry recorded again in the meantime is kept as is.
    fn restore(&self, entries: Vec<CacheEntryView>) -> Result<()>;
}

/// In-process catalog fed by observing the invoker.
///
/// Register it with `CacheInvoker::add_observer`; puts record an entry,
/// gets count reads, evicts and clears drop entries. Entries are keyed by
/// store name and rendered key.
pub struct MemoryCatalog {
    entries: RwLock<BTreeMap<(String, String), CacheEntryView>>,
    fallback_app_name: String,
}

impl MemoryCatalog {
    /// `fallback_app_name` attributes entries whose context names no application
    pub fn new(fallback_app_name: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            fallback_app_name: fallback_app_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Look up a single entry
    pub fn entry(&self, cache_name: &str, cache_key: &str) -> Option<CacheEntryView> {
        self.entries
            .read()
            .get(&(cache_name.to_string(), cache_key.to_string()))
            .cloned()
    }

    fn collect<F>(&self, app_name: &str, filter: F) -> Vec<CacheEntryView>
    where
        F: Fn(&CacheEntryView) -> bool,
    {
        let mut found: Vec<CacheEntryView> = self
            .entries
            .read()
            .values()
            .filter(|entry| entry.app_name == app_name && filter(entry))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (&a.class_name, &a.cache_name, &a.cache_key).cmp(&(
                &b.class_name,
                &b.cache_name,
                &b.cache_key,
            ))
        });
        found
    }

    fn remove_where<F>(&self, app_name: &str, filter: F) -> Vec<CacheEntryView>
    where
        F: Fn(&CacheEntryView) -> bool,
    {
        let mut entries = self.entries.write();
        let mut removed = Vec::new();
        entries.retain(|_, entry| {
            if entry.app_name == app_name && filter(entry) {
                removed.push(entry.clone());
                false
            } else {
                true
            }
        });
        removed.sort_by(|a, b| a.cache_key.cmp(&b.cache_key));
        removed
    }
}

impl CacheCatalog for MemoryCatalog {
    fn all(&self, app_name: &str, page: PageRequest) -> Result<PageInfo<CacheEntryView>> {
        Ok(PageInfo::paginate(self.collect(app_name, |_| true), page))
    }

    fn search(
        &self,
        param: &SearchParam,
        app_name: &str,
        page: PageRequest,
    ) -> Result<PageInfo<CacheEntryView>> {
        Ok(PageInfo::paginate(
            self.collect(app_name, |entry| param.matches(entry)),
            page,
        ))
    }

    fn remove_class_name(
        &self,
        class_name: &str,
        cache_key: Option<&str>,
        app_name: &str,
    ) -> Result<Vec<CacheEntryView>> {
        let removed = self.remove_where(app_name, |entry| {
            entry.class_name.as_deref() == Some(class_name)
                && cache_key.map_or(true, |key| entry.cache_key == key)
        });
        debug!(
            class_name = class_name,
            app_name = app_name,
            removed = removed.len(),
            "Removed catalog entries by class"
        );
        Ok(removed)
    }

    fn remove_cache_name(
        &self,
        cache_name: &str,
        cache_key: Option<&str>,
        app_name: &str,
    ) -> Result<Vec<CacheEntryView>> {
        let removed = self.remove_where(app_name, |entry| {
            entry.cache_name == cache_name && cache_key.map_or(true, |key| entry.cache_key == key)
        });
        debug!(
            cache_name = cache_name,
            app_name = app_name,
            removed = removed.len(),
            "Removed catalog entries by cache name"
        );
        Ok(removed)
    }

    fn restore(&self, entries: Vec<CacheEntryView>) -> Result<()> {
        let mut current = self.entries.write();
        for entry in entries {
            current
                .entry((entry.cache_name.clone(), entry.cache_key.clone()))
                .or_insert(entry);
        }
        Ok(())
    }
}

impl<K: Display, V> CacheObserver<K, V> for MemoryCatalog {
    fn name(&self) -> &str {
        "memory-catalog"
    }

    fn after_get(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        _context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        let id = (store.name().to_string(), key.to_string());
        if let Some(entry) = self.entries.write().get_mut(&id) {
            entry.reads += 1;
        }
        Ok(())
    }

    fn after_put(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        _value: Option<&V>,
        context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        let entry = CacheEntryView {
            app_name: context
                .app_name()
                .unwrap_or(&self.fallback_app_name)
                .to_string(),
            class_name: context.class_name().map(str::to_string),
            method_name: context.operation().to_string(),
            cache_name: store.name().to_string(),
            cache_key: key.to_string(),
            created_at: Utc::now(),
            reads: 0,
        };
        debug!(
            cache_name = %entry.cache_name,
            cache_key = %entry.cache_key,
            "Recorded catalog entry"
        );
        self.entries
            .write()
            .insert((entry.cache_name.clone(), entry.cache_key.clone()), entry);
        Ok(())
    }

    fn after_evict(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        _context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        self.entries
            .write()
            .remove(&(store.name().to_string(), key.to_string()));
        Ok(())
    }

    fn after_clear(
        &self,
        store: &dyn CacheStore<K, V>,
        _context: &OperationContext,
    ) -> std::result::Result<(), ObserverError> {
        let name = store.name();
        self.entries
            .write()
            .retain(|(cache_name, _), _| cache_name != name);
        Ok(())
    }
}
