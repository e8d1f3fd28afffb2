//! Cache management endpoint
//!
//! Operator-facing operations over the catalog: list, search, remove by key
//! and remove by class or cache name. Responses are plain values with JSON
//! renderings, so any HTTP layer can expose them.

use crate::catalog::CacheCatalog;
use crate::config::AdminConfig;
use crate::errors::{AdminError, Result};
use crate::model::{CacheEntryView, PageInfo, PageRequest, RemoveModel, SearchParam};
use crate::notifier::InvalidationNotifier;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Management operations for cached entries
pub struct CacheManagerEndpoint {
    catalog: Arc<dyn CacheCatalog>,
    notifier: Arc<dyn InvalidationNotifier>,
    config: AdminConfig,
}

impl CacheManagerEndpoint {
    pub fn new(
        catalog: Arc<dyn CacheCatalog>,
        notifier: Arc<dyn InvalidationNotifier>,
        config: AdminConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            notifier,
            config,
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Resolve a raw page request: index 0 means the first page, size 0 means
    /// the default size, and sizes are capped at the configured maximum.
    pub fn page_request(&self, page_index: usize, page_size: usize) -> PageRequest {
        let size = if page_size == 0 {
            self.config.default_page_size
        } else {
            page_size.min(self.config.max_page_size)
        };
        PageRequest::new(page_index, size)
    }

    fn app_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.config.app_name,
        }
    }

    /// List every entry of an application
    pub fn all_cache(
        &self,
        app_name: Option<&str>,
        page_index: usize,
        page_size: usize,
    ) -> Result<PageInfo<CacheEntryView>> {
        let app_name = self.app_name(app_name);
        let page = self.page_request(page_index, page_size);
        debug!(app_name = app_name, page = page.index, size = page.size, "Listing cache entries");
        self.catalog.all(app_name, page)
    }

    /// List the entries matching `param`
    pub fn search(&self, param: &SearchParam) -> Result<PageInfo<CacheEntryView>> {
        let app_name = self.app_name(param.app_name.as_deref());
        let page = self.page_request(param.page_index, param.page_size);
        debug!(app_name = app_name, criteria = ?param, "Searching cache entries");
        self.catalog.search(param, app_name, page)
    }

    /// Invalidate a key for the configured application
    pub fn remove(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(AdminError::invalid_request("key", "must not be empty"));
        }
        info!(key = key, app_name = %self.config.app_name, "Removing cache key");
        self.notifier.notify_evict(key, &self.config.app_name)
    }

    /// Remove every entry of a class or of a cache, depending on `param.model`,
    /// and invalidate each removed entry. Returns how many entries were removed.
    ///
    /// Every removed entry is invalidated even if an earlier invalidation
    /// failed. Entries that could not be invalidated are put back in the
    /// catalog, so the removal can be retried, and the first failure is
    /// returned.
    pub fn remove_config(&self, param: &SearchParam) -> Result<usize> {
        let app_name = self.app_name(param.app_name.as_deref());
        let cache_key = param.cache_key.as_deref().filter(|k| !k.is_empty());

        let removed = match param.model {
            RemoveModel::ClassName => {
                let class_name = required(&param.class_name, "class_name")?;
                self.catalog
                    .remove_class_name(class_name, cache_key, app_name)?
            }
            RemoveModel::CacheName => {
                let cache_name = required(&param.cache_name, "cache_name")?;
                self.catalog
                    .remove_cache_name(cache_name, cache_key, app_name)?
            }
        };
        info!(
            app_name = app_name,
            model = ?param.model,
            removed = removed.len(),
            "Removed cache entries"
        );

        let total = removed.len();
        let mut first_error = None;
        let mut failed = Vec::new();
        for entry in removed {
            if let Err(e) = self.notifier.notify_removed(&entry) {
                warn!(cache_key = %entry.cache_key, error = %e, "Failed to invalidate removed entry");
                first_error.get_or_insert(e);
                failed.push(entry);
            }
        }
        match first_error {
            Some(e) => {
                debug!(restored = failed.len(), "Restoring entries that are still cached");
                self.catalog.restore(failed)?;
                Err(e)
            }
            None => Ok(total),
        }
    }

    pub fn all_cache_json(
        &self,
        app_name: Option<&str>,
        page_index: usize,
        page_size: usize,
    ) -> Result<String> {
        let page = self.all_cache(app_name, page_index, page_size)?;
        Ok(serde_json::to_string_pretty(&page)?)
    }

    pub fn search_json(&self, param: &SearchParam) -> Result<String> {
        let page = self.search(param)?;
        Ok(serde_json::to_string_pretty(&page)?)
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AdminError::invalid_request(field, "is required for this removal model")),
    }
}
