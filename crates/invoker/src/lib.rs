//! Cache operation invoker
//!
//! Executes the four cache operations (get, put, evict, clear) against a
//! [`CacheStore`], hands failures to a pluggable [`ErrorPolicy`] and notifies
//! an ordered chain of [`CacheObserver`]s after every successful call.
//!
//! ```
//! use cachewrap_invoker::testing::{CountingObserver, MemoryStore};
//! use cachewrap_invoker::{CacheInvoker, Lookup, OperationContext, OperationKind};
//! use std::sync::Arc;
//!
//! let store = MemoryStore::<String, u32>::new("users");
//! let counter = Arc::new(CountingObserver::default());
//! let mut invoker: CacheInvoker<String, u32> = CacheInvoker::new();
//! invoker.add_observer(counter.clone());
//!
//! let ctx = OperationContext::new("UserService.find(id)");
//! let key = "user:1".to_string();
//! invoker.put(&store, &key, Some(&42), &ctx)?;
//! assert_eq!(invoker.get(&store, &key, &ctx)?, Lookup::hit(42));
//! assert_eq!(counter.count(OperationKind::Get), 1);
//! # Ok::<(), cachewrap_invoker::CacheError>(())
//! ```

pub mod config;
pub mod invoker;
pub mod observer;
pub mod policy;

pub mod testing;

pub use cachewrap_core::{
    CacheError, CacheStore, Lookup, ObserverError, OperationContext, OperationKind, Result,
    StoreError,
};
pub use config::{ErrorPolicyConfig, InvokerConfig, InvokerConfigBuilder, LogLevel, ObserverFailureMode};
pub use invoker::CacheInvoker;
pub use observer::{CacheObserver, ObserverChain};
pub use policy::{ErrorPolicy, LoggingErrorPolicy, PropagatingErrorPolicy};
