//! Management surface for cached entries
//!
//! Lists and searches the entries recorded by a [`CacheCatalog`], and removes
//! entries by key, by class or by cache name. Removal is forwarded to an
//! [`InvalidationNotifier`], which typically evicts through the invoker.
//!
//! [`MemoryCatalog`] is an in-process catalog that registers itself as a
//! cache observer and keeps track of what the invoker has written.

pub mod catalog;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod model;
pub mod notifier;

pub use catalog::{CacheCatalog, MemoryCatalog};
pub use config::AdminConfig;
pub use endpoint::CacheManagerEndpoint;
pub use errors::{AdminError, Result};
pub use model::{CacheEntryView, PageInfo, PageRequest, RemoveModel, SearchParam};
pub use notifier::{InvalidationNotifier, StoreInvalidator};
