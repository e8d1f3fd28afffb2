//! Core domain types and errors for `cachewrap`.
//!
//! This crate defines the boundary the invoker works against:
//!
//! - **`store`**: the `CacheStore` trait, the key-value store wrapped by the invoker.
//! - **`lookup`**: the three-state `Lookup` returned by a read (miss, cached null, value).
//! - **`context`**: `OperationContext`, the correlation value handed through to observers.
//! - **`errors`**: `StoreError` raised by stores and `CacheError`, the per-operation
//!   failure handed to error policies and propagated to callers.

pub mod context;
pub mod errors;
pub mod lookup;
pub mod store;
pub mod types;

pub use self::{
    context::OperationContext,
    errors::{CacheError, ConfigError, ObserverError, Result, StoreError, StoreResult},
    lookup::Lookup,
    store::CacheStore,
    types::OperationKind,
};
