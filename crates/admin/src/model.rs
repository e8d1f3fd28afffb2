//! Request and response types for the management surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached entry as shown to operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryView {
    pub app_name: String,
    pub class_name: Option<String>,
    pub method_name: String,
    pub cache_name: String,
    pub cache_key: String,
    pub created_at: DateTime<Utc>,
    /// Successful reads through the invoker since the entry was recorded.
    /// Observers do not see the read result, so misses are counted too.
    pub reads: u64,
}

/// A resolved page request; `index` is 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> Self {
        Self {
            index: index.max(1),
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        (self.index - 1).saturating_mul(self.size)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo<T> {
    pub page_index: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
}

impl<T> PageInfo<T> {
    /// Cut the requested page out of the full, already ordered result set
    pub fn paginate(all: Vec<T>, page: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .collect();
        Self {
            page_index: page.index,
            page_size: page.size,
            total,
            total_pages: total.div_ceil(page.size),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// How `remove_config` selects entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveModel {
    /// Every entry written on behalf of a class
    ClassName,
    /// Every entry of a named cache
    #[default]
    CacheName,
}

impl RemoveModel {
    /// Legacy numeric form: `1` selects by class, anything else by cache name
    pub fn from_code(code: i32) -> Self {
        if code == 1 {
            RemoveModel::ClassName
        } else {
            RemoveModel::CacheName
        }
    }
}

/// Search and removal criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParam {
    pub app_name: Option<String>,
    /// Exact class name
    pub class_name: Option<String>,
    /// Exact cache name
    pub cache_name: Option<String>,
    /// Exact cached operation name
    pub method_name: Option<String>,
    /// Substring of the cache key
    pub cache_key: Option<String>,
    pub page_index: usize,
    pub page_size: usize,
    pub model: RemoveModel,
}

impl SearchParam {
    /// Whether `entry` satisfies every set criterion (the app name is not checked here)
    pub fn matches(&self, entry: &CacheEntryView) -> bool {
        let exact = |wanted: &Option<String>, actual: Option<&str>| match wanted {
            Some(w) => actual == Some(w.as_str()),
            None => true,
        };

        exact(&self.class_name, entry.class_name.as_deref())
            && exact(&self.cache_name, Some(entry.cache_name.as_str()))
            && exact(&self.method_name, Some(entry.method_name.as_str()))
            && self
                .cache_key
                .as_ref()
                .map_or(true, |fragment| entry.cache_key.contains(fragment.as_str()))
    }
}
