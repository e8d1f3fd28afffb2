//! End-to-end scenarios for the cache invoker

use cachewrap_invoker::testing::{CountingObserver, EventLog, MemoryStore, RecordingObserver};
use cachewrap_invoker::{
    CacheError, CacheInvoker, CacheObserver, CacheStore, ErrorPolicy, Lookup, LoggingErrorPolicy,
    ObserverError, OperationContext, OperationKind,
};
use std::sync::Arc;
use std::thread;

fn context() -> OperationContext {
    OperationContext::new("CatalogService.price(sku)")
        .with_app_name("shop")
        .with_class_name("CatalogService")
        .with_cache_name("prices")
}

#[test]
fn counting_observer_follows_put_get_evict_get() {
    let store = MemoryStore::<String, i64>::new("prices");
    let counter = Arc::new(CountingObserver::default());
    let mut invoker: CacheInvoker<String, i64> = CacheInvoker::new();
    invoker.add_observer(counter.clone());
    let ctx = context();
    let a = "a".to_string();

    invoker.put(&store, &a, Some(&1), &ctx).unwrap();
    assert_eq!(counter.count(OperationKind::Put), 1);

    assert_eq!(invoker.get(&store, &a, &ctx).unwrap(), Lookup::hit(1));
    assert_eq!(counter.count(OperationKind::Get), 1);

    invoker.evict(&store, &a, &ctx).unwrap();
    assert_eq!(counter.count(OperationKind::Evict), 1);

    assert_eq!(invoker.get(&store, &a, &ctx).unwrap(), Lookup::Miss);
    assert_eq!(counter.count(OperationKind::Get), 2);
}

#[test]
fn swallowing_get_errors_does_not_hide_put_errors() {
    let store = MemoryStore::<String, i64>::new("prices");
    let x = "x".to_string();
    store.fail_on_key(OperationKind::Get, x.clone());
    store.fail_on_key(OperationKind::Put, x.clone());
    let invoker: CacheInvoker<String, i64> =
        CacheInvoker::with_error_policy(LoggingErrorPolicy::swallowing([OperationKind::Get]));
    let ctx = context();

    assert_eq!(invoker.get(&store, &x, &ctx).unwrap(), Lookup::Miss);

    let err = invoker.put(&store, &x, Some(&5), &ctx).unwrap_err();
    assert!(matches!(err, CacheError::Put { ref store, .. } if store == "prices"));

    // other keys are unaffected
    let y = "y".to_string();
    invoker.put(&store, &y, Some(&5), &ctx).unwrap();
    assert_eq!(invoker.get(&store, &y, &ctx).unwrap(), Lookup::hit(5));
}

#[test]
fn each_operation_makes_exactly_one_store_call() {
    let store = MemoryStore::<String, i64>::new("prices");
    store.fail_on(OperationKind::Evict);
    let invoker: CacheInvoker<String, i64> =
        CacheInvoker::with_error_policy(LoggingErrorPolicy::swallow_all());
    let ctx = context();
    let k = "k".to_string();

    invoker.put(&store, &k, Some(&1), &ctx).unwrap();
    invoker.get(&store, &k, &ctx).unwrap();
    invoker.evict(&store, &k, &ctx).unwrap();
    invoker.clear(&store, &ctx).unwrap();

    for op in OperationKind::ALL {
        assert_eq!(store.calls(op), 1, "{op} should reach the store once");
    }
}

/// One policy callback, as seen by [`ReadTolerantPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
struct HandledFailure {
    handler: &'static str,
    failed: OperationKind,
    key: Option<String>,
    value: Option<Option<i64>>,
}

/// Swallows get and evict, but keeps write failures visible. Records every
/// handler call so routing can be checked.
#[derive(Default)]
struct ReadTolerantPolicy {
    handled: parking_lot::Mutex<Vec<HandledFailure>>,
}

impl ReadTolerantPolicy {
    fn record(
        &self,
        handler: &'static str,
        error: &CacheError,
        key: Option<&String>,
        value: Option<Option<&i64>>,
    ) {
        self.handled.lock().push(HandledFailure {
            handler,
            failed: error.operation(),
            key: key.cloned(),
            value: value.map(|v| v.copied()),
        });
    }

    fn last(&self) -> Option<HandledFailure> {
        self.handled.lock().last().cloned()
    }

    fn count(&self) -> usize {
        self.handled.lock().len()
    }
}

impl ErrorPolicy<String, i64> for ReadTolerantPolicy {
    fn handle_get_error(
        &self,
        error: CacheError,
        _store: &dyn CacheStore<String, i64>,
        key: &String,
    ) -> cachewrap_invoker::Result<()> {
        self.record("get", &error, Some(key), None);
        Ok(())
    }

    fn handle_put_error(
        &self,
        error: CacheError,
        _store: &dyn CacheStore<String, i64>,
        key: &String,
        value: Option<&i64>,
    ) -> cachewrap_invoker::Result<()> {
        self.record("put", &error, Some(key), Some(value));
        Err(error)
    }

    fn handle_evict_error(
        &self,
        error: CacheError,
        _store: &dyn CacheStore<String, i64>,
        key: &String,
    ) -> cachewrap_invoker::Result<()> {
        self.record("evict", &error, Some(key), None);
        Ok(())
    }

    fn handle_clear_error(
        &self,
        error: CacheError,
        _store: &dyn CacheStore<String, i64>,
    ) -> cachewrap_invoker::Result<()> {
        self.record("clear", &error, None, None);
        Err(error)
    }
}

#[test]
fn failures_reach_only_the_matching_handler() {
    let store = MemoryStore::<String, i64>::new("prices");
    for op in OperationKind::ALL {
        store.fail_on(op);
    }
    let policy = Arc::new(ReadTolerantPolicy::default());
    let invoker: CacheInvoker<String, i64> = CacheInvoker::with_error_policy(policy.clone());
    let ctx = context();
    let k = "k".to_string();

    assert!(invoker.get(&store, &k, &ctx).unwrap().is_miss());
    assert_eq!(policy.count(), 1);
    assert_eq!(
        policy.last(),
        Some(HandledFailure {
            handler: "get",
            failed: OperationKind::Get,
            key: Some(k.clone()),
            value: None,
        })
    );

    assert!(invoker.put(&store, &k, Some(&7), &ctx).is_err());
    assert_eq!(policy.count(), 2);
    assert_eq!(
        policy.last(),
        Some(HandledFailure {
            handler: "put",
            failed: OperationKind::Put,
            key: Some(k.clone()),
            value: Some(Some(7)),
        })
    );

    assert!(invoker.put(&store, &k, None, &ctx).is_err());
    assert_eq!(policy.count(), 3);
    assert_eq!(policy.last().and_then(|h| h.value), Some(None));

    assert!(invoker.evict(&store, &k, &ctx).is_ok());
    assert_eq!(policy.count(), 4);
    assert_eq!(
        policy.last(),
        Some(HandledFailure {
            handler: "evict",
            failed: OperationKind::Evict,
            key: Some(k.clone()),
            value: None,
        })
    );

    assert!(invoker.clear(&store, &ctx).is_err());
    assert_eq!(policy.count(), 5);
    assert_eq!(
        policy.last(),
        Some(HandledFailure {
            handler: "clear",
            failed: OperationKind::Clear,
            key: None,
            value: None,
        })
    );
}

#[test]
fn successful_operations_never_reach_the_policy() {
    let store = MemoryStore::<String, i64>::new("prices");
    let policy = Arc::new(ReadTolerantPolicy::default());
    let invoker: CacheInvoker<String, i64> = CacheInvoker::with_error_policy(policy.clone());
    let ctx = context();
    let k = "k".to_string();

    invoker.put(&store, &k, Some(&1), &ctx).unwrap();
    invoker.get(&store, &k, &ctx).unwrap();
    invoker.evict(&store, &k, &ctx).unwrap();
    invoker.clear(&store, &ctx).unwrap();

    assert_eq!(policy.count(), 0);
}

/// Rejects nothing; remembers which context ids it saw
struct ContextCollector {
    seen: parking_lot::Mutex<Vec<uuid::Uuid>>,
}

impl CacheObserver<String, i64> for ContextCollector {
    fn after_get(
        &self,
        _store: &dyn CacheStore<String, i64>,
        _key: &String,
        context: &OperationContext,
    ) -> Result<(), ObserverError> {
        self.seen.lock().push(context.id());
        Ok(())
    }
}

#[test]
fn context_is_passed_through_untouched() {
    let store = MemoryStore::<String, i64>::new("prices");
    let collector = Arc::new(ContextCollector {
        seen: parking_lot::Mutex::new(Vec::new()),
    });
    let mut invoker: CacheInvoker<String, i64> = CacheInvoker::new();
    invoker.add_observer(collector.clone());
    let ctx = context();
    let before = ctx.clone();

    invoker.get(&store, &"k".to_string(), &ctx).unwrap();

    assert_eq!(ctx, before);
    assert_eq!(*collector.seen.lock(), vec![ctx.id()]);
}

#[test]
fn invoker_is_shared_across_threads() {
    let store = Arc::new(MemoryStore::<String, i64>::new("prices"));
    let log = EventLog::default();
    let counter = Arc::new(CountingObserver::default());
    let mut invoker: CacheInvoker<String, i64> = CacheInvoker::new();
    invoker.add_observer(Arc::new(RecordingObserver::new("first", log.clone())));
    invoker.add_observer(counter.clone());
    let invoker = Arc::new(invoker);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let invoker = Arc::clone(&invoker);
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let ctx = context();
                for i in 0..25 {
                    let key = format!("t{t}-{i}");
                    invoker.put(&*store, &key, Some(&i), &ctx).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counter.count(OperationKind::Put), 100);
    assert_eq!(log.events().len(), 100);
    assert_eq!(store.len(), 100);
}
