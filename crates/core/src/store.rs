//! The key-value store boundary wrapped by the invoker

use crate::errors::StoreResult;
use crate::lookup::Lookup;
use std::sync::Arc;

/// A cache store holding values of type `V` under keys of type `K`.
///
/// Implementations own their own synchronization; the invoker calls these
/// methods from whatever thread the caller is on.
pub trait CacheStore<K, V>: Send + Sync {
    /// Identity of the store, used in errors and by observers
    fn name(&self) -> &str;

    /// Look up a key, distinguishing a miss from a cached null
    fn get(&self, key: &K) -> StoreResult<Lookup<V>>;

    /// Store a value; `None` caches an explicit null
    fn put(&self, key: &K, value: Option<&V>) -> StoreResult<()>;

    /// Remove a single key
    fn evict(&self, key: &K) -> StoreResult<()>;

    /// Remove every key
    fn clear(&self) -> StoreResult<()>;
}

impl<K, V, S> CacheStore<K, V> for Arc<S>
where
    S: CacheStore<K, V> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &K) -> StoreResult<Lookup<V>> {
        (**self).get(key)
    }

    fn put(&self, key: &K, value: Option<&V>) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn evict(&self, key: &K) -> StoreResult<()> {
        (**self).evict(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}
