//! Test doubles for exercising the invoker: an in-memory store with
//! programmable failures and a few observers that record what they see.

use crate::observer::CacheObserver;
use cachewrap_core::{
    CacheStore, Lookup, ObserverError, OperationContext, OperationKind, StoreError, StoreResult,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// In-memory store. Clearing an empty store succeeds.
pub struct MemoryStore<K, V> {
    name: String,
    entries: Mutex<HashMap<K, Option<V>>>,
    failures: Mutex<Vec<(OperationKind, Option<K>)>>,
    calls: Mutex<BTreeMap<OperationKind, usize>>,
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
            calls: Mutex::new(BTreeMap::new()),
        }
    }

    /// Seed an entry without going through the store API
    pub fn insert(&self, key: K, value: Option<V>) {
        self.entries.lock().insert(key, value);
    }

    /// Make every call of `operation` fail
    pub fn fail_on(&self, operation: OperationKind) {
        self.failures.lock().push((operation, None));
    }

    /// Make calls of `operation` on `key` fail
    pub fn fail_on_key(&self, operation: OperationKind, key: K) {
        self.failures.lock().push((operation, Some(key)));
    }

    pub fn heal(&self) {
        self.failures.lock().clear();
    }

    /// Number of calls that reached the store, failed or not
    pub fn calls(&self, operation: OperationKind) -> usize {
        self.calls.lock().get(&operation).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.lock().contains_key(key)
    }

    fn check(&self, operation: OperationKind, key: Option<&K>) -> StoreResult<()> {
        *self.calls.lock().entry(operation).or_insert(0) += 1;

        let failing = self.failures.lock().iter().any(|(op, failing_key)| {
            *op == operation
                && match failing_key {
                    None => true,
                    Some(k) => Some(k) == key,
                }
        });
        if failing {
            Err(StoreError::backend(
                self.name.clone(),
                format!("injected {operation} failure"),
            ))
        } else {
            Ok(())
        }
    }
}

impl<K, V> CacheStore<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &K) -> StoreResult<Lookup<V>> {
        self.check(OperationKind::Get, Some(key))?;
        Ok(self.entries.lock().get(key).cloned().into())
    }

    fn put(&self, key: &K, value: Option<&V>) -> StoreResult<()> {
        self.check(OperationKind::Put, Some(key))?;
        self.entries.lock().insert(key.clone(), value.cloned());
        Ok(())
    }

    fn evict(&self, key: &K) -> StoreResult<()> {
        self.check(OperationKind::Evict, Some(key))?;
        self.entries.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.check(OperationKind::Clear, None)?;
        self.entries.lock().clear();
        Ok(())
    }
}

/// One observer callback, as seen by a [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEvent {
    pub label: String,
    pub operation: OperationKind,
    pub store: String,
    pub key: Option<String>,
    pub value: Option<String>,
    pub context_id: Uuid,
}

/// Event log shared between several recording observers
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<ObservedEvent>>>);

impl EventLog {
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.0.lock().clone()
    }

    /// Observer labels in the order callbacks arrived
    pub fn labels(&self) -> Vec<String> {
        self.0.lock().iter().map(|e| e.label.clone()).collect()
    }

    fn push(&self, event: ObservedEvent) {
        self.0.lock().push(event);
    }
}

/// Appends every callback to a shared [`EventLog`]
pub struct RecordingObserver {
    label: String,
    log: EventLog,
}

impl RecordingObserver {
    pub fn new(label: impl Into<String>, log: EventLog) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }

    fn record(
        &self,
        operation: OperationKind,
        store: &str,
        key: Option<String>,
        value: Option<String>,
        context: &OperationContext,
    ) {
        self.log.push(ObservedEvent {
            label: self.label.clone(),
            operation,
            store: store.to_string(),
            key,
            value,
            context_id: context.id(),
        });
    }
}

impl<K: Debug, V: Debug> CacheObserver<K, V> for RecordingObserver {
    fn name(&self) -> &str {
        &self.label
    }

    fn after_get(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.record(OperationKind::Get, store.name(), Some(format!("{key:?}")), None, context);
        Ok(())
    }

    fn after_put(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        value: Option<&V>,
        context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.record(
            OperationKind::Put,
            store.name(),
            Some(format!("{key:?}")),
            value.map(|v| format!("{v:?}")),
            context,
        );
        Ok(())
    }

    fn after_evict(
        &self,
        store: &dyn CacheStore<K, V>,
        key: &K,
        context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.record(OperationKind::Evict, store.name(), Some(format!("{key:?}")), None, context);
        Ok(())
    }

    fn after_clear(
        &self,
        store: &dyn CacheStore<K, V>,
        context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.record(OperationKind::Clear, store.name(), None, None, context);
        Ok(())
    }
}

/// Counts callbacks per operation
#[derive(Debug, Default)]
pub struct CountingObserver {
    get: AtomicUsize,
    put: AtomicUsize,
    evict: AtomicUsize,
    clear: AtomicUsize,
}

impl CountingObserver {
    fn counter(&self, operation: OperationKind) -> &AtomicUsize {
        match operation {
            OperationKind::Get => &self.get,
            OperationKind::Put => &self.put,
            OperationKind::Evict => &self.evict,
            OperationKind::Clear => &self.clear,
        }
    }

    pub fn count(&self, operation: OperationKind) -> usize {
        self.counter(operation).load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        OperationKind::ALL.iter().map(|op| self.count(*op)).sum()
    }

    fn bump(&self, operation: OperationKind) -> Result<(), ObserverError> {
        self.counter(operation).fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<K, V> CacheObserver<K, V> for CountingObserver {
    fn name(&self) -> &str {
        "counting"
    }

    fn after_get(
        &self,
        _store: &dyn CacheStore<K, V>,
        _key: &K,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.bump(OperationKind::Get)
    }

    fn after_put(
        &self,
        _store: &dyn CacheStore<K, V>,
        _key: &K,
        _value: Option<&V>,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.bump(OperationKind::Put)
    }

    fn after_evict(
        &self,
        _store: &dyn CacheStore<K, V>,
        _key: &K,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.bump(OperationKind::Evict)
    }

    fn after_clear(
        &self,
        _store: &dyn CacheStore<K, V>,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.bump(OperationKind::Clear)
    }
}

/// Fails the callbacks of the given operations
pub struct FailingObserver {
    name: String,
    failing: Vec<OperationKind>,
}

impl FailingObserver {
    pub fn new(name: impl Into<String>, failing: impl IntoIterator<Item = OperationKind>) -> Self {
        Self {
            name: name.into(),
            failing: failing.into_iter().collect(),
        }
    }

    fn outcome(&self, operation: OperationKind) -> Result<(), ObserverError> {
        if self.failing.contains(&operation) {
            Err(format!("{} rejected {operation}", self.name).into())
        } else {
            Ok(())
        }
    }
}

impl<K, V> CacheObserver<K, V> for FailingObserver {
    fn name(&self) -> &str {
        &self.name
    }

    fn after_get(
        &self,
        _store: &dyn CacheStore<K, V>,
        _key: &K,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.outcome(OperationKind::Get)
    }

    fn after_put(
        &self,
        _store: &dyn CacheStore<K, V>,
        _key: &K,
        _value: Option<&V>,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.outcome(OperationKind::Put)
    }

    fn after_evict(
        &self,
        _store: &dyn CacheStore<K, V>,
        _key: &K,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.outcome(OperationKind::Evict)
    }

    fn after_clear(
        &self,
        _store: &dyn CacheStore<K, V>,
        _context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.outcome(OperationKind::Clear)
    }
}
