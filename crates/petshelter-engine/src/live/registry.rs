//! Subscription registry.
//!
//! The registry observes the store's invalidation tracker. On every table
//! change it re-runs each subscription whose query reads that table and
//! pushes the result to the subscriber.
//!
//! Each subscription serializes its own deliveries. A change that arrives
//! while a delivery is in flight (including one caused by the callback
//! itself) marks the subscription dirty, and the in-flight delivery loops
//! to pick it up once the callback returns. Results carry the store data
//! version they were read at; a result no newer than the last one delivered
//! is dropped, so a subscriber never goes back in time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError, Weak};

use petshelter_store::{InvalidationObserver, ObserverId, PetStore, TableChange};
use tokio::sync::watch;

use super::callback::{FnCallback, LiveQueryCallback, LiveQueryHandle, Shared};
use super::query::LiveQuery;

/// Identifies one subscription within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Per-subscription delivery options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionConfig {
    /// Skip a delivery whose result equals the previous one
    pub distinct_until_changed: bool,
}

impl SubscriptionConfig {
    pub fn distinct() -> Self {
        Self {
            distinct_until_changed: true,
        }
    }
}

/// Type-erased view of a subscription used by the registry
trait Subscription: Send + Sync {
    fn reads(&self, table: &str) -> bool;

    /// Re-run the query and deliver; `wait` blocks for an in-flight delivery
    /// instead of leaving the work to it
    fn refresh(&self, store: &PetStore, wait: bool);

    fn deactivate(&self);
}

struct Delivery {
    /// Data version of the last delivered result
    last_version: Option<u64>,
}

struct QuerySubscription<Q: LiveQuery> {
    id: SubscriptionId,
    query: Q,
    config: SubscriptionConfig,
    callback: Box<dyn LiveQueryCallback<Q::Output>>,
    shared: Arc<Shared<Q::Output>>,
    dirty: AtomicBool,
    delivery: Mutex<Delivery>,
}

impl<Q: LiveQuery> QuerySubscription<Q> {
    fn deliver(&self, store: &PetStore, delivery: &mut Delivery) {
        let (version, value) = match self.query.run(store) {
            Ok(result) => result,
            Err(err) => {
                if self.shared.is_active() {
                    self.callback.on_error(&err);
                }
                return;
            }
        };

        if delivery.last_version.is_some_and(|last| version <= last) {
            tracing::trace!(
                subscription_id = self.id.get(),
                version,
                "skipping result already delivered"
            );
            return;
        }
        delivery.last_version = Some(version);

        {
            let mut latest = self
                .shared
                .latest
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if self.config.distinct_until_changed && latest.as_ref() == Some(&value) {
                return;
            }
            *latest = Some(value.clone());
        }

        if self.shared.is_active() {
            tracing::trace!(
                subscription_id = self.id.get(),
                query = %self.query.label(),
                version,
                "delivering live query result"
            );
            self.callback.on_change(&value);
        }
    }
}

impl<Q: LiveQuery> Subscription for QuerySubscription<Q> {
    fn reads(&self, table: &str) -> bool {
        self.query.tables().iter().any(|t| *t == table)
    }

    fn refresh(&self, store: &PetStore, wait: bool) {
        self.dirty.store(true, Ordering::SeqCst);
        let mut wait = wait;

        loop {
            if !self.shared.is_active() {
                return;
            }

            let mut delivery: MutexGuard<'_, Delivery> = if wait {
                self.delivery
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
            } else {
                match self.delivery.try_lock() {
                    Ok(guard) => guard,
                    // The holder will see the dirty flag when it finishes
                    Err(TryLockError::WouldBlock) => return,
                    Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                }
            };
            wait = false;

            if !self.dirty.swap(false, Ordering::SeqCst) {
                return;
            }
            self.deliver(store, &mut delivery);
            drop(delivery);

            if !self.dirty.load(Ordering::SeqCst) {
                return;
            }
        }
    }

    fn deactivate(&self) {
        self.shared.active.store(false, Ordering::SeqCst);
    }
}

/// Live query subscriptions over one store
pub struct LiveQueryRegistry {
    store: Arc<PetStore>,
    subscriptions: RwLock<HashMap<SubscriptionId, Arc<dyn Subscription>>>,
    next_id: AtomicU64,
    observer_id: ObserverId,
}

impl LiveQueryRegistry {
    /// Create a registry and start observing `store`
    pub fn new(store: Arc<PetStore>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let observer: Weak<dyn InvalidationObserver> = weak.clone();
            let observer_id = store.tracker().register(observer);
            Self {
                store,
                subscriptions: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                observer_id,
            }
        })
    }

    pub fn store(&self) -> &Arc<PetStore> {
        &self.store
    }

    /// Subscribe with the default configuration
    ///
    /// The query's current result is delivered before this returns.
    pub fn subscribe<Q, C>(self: &Arc<Self>, query: Q, callback: C) -> LiveQueryHandle<Q::Output>
    where
        Q: LiveQuery,
        C: LiveQueryCallback<Q::Output>,
    {
        self.subscribe_with_config(query, SubscriptionConfig::default(), callback)
    }

    /// Subscribe with a closure as the callback
    pub fn subscribe_fn<Q, F>(self: &Arc<Self>, query: Q, f: F) -> LiveQueryHandle<Q::Output>
    where
        Q: LiveQuery,
        F: Fn(&Q::Output) + Send + Sync + 'static,
    {
        self.subscribe(query, FnCallback(f))
    }

    pub fn subscribe_with_config<Q, C>(
        self: &Arc<Self>,
        query: Q,
        config: SubscriptionConfig,
        callback: C,
    ) -> LiveQueryHandle<Q::Output>
    where
        Q: LiveQuery,
        C: LiveQueryCallback<Q::Output>,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let shared = Arc::new(Shared::new());
        let label = query.label();

        let subscription = Arc::new(QuerySubscription {
            id,
            query,
            config,
            callback: Box::new(callback),
            shared: Arc::clone(&shared),
            dirty: AtomicBool::new(false),
            delivery: Mutex::new(Delivery { last_version: None }),
        });

        // Registered before the first run so no write can fall between them
        self.write_subscriptions()
            .insert(id, Arc::clone(&subscription) as Arc<dyn Subscription>);

        tracing::debug!(
            subscription_id = id.get(),
            query = %label,
            "live query subscribed"
        );

        subscription.refresh(&self.store, true);
        LiveQueryHandle::new(id, Arc::downgrade(self), shared)
    }

    /// Subscribe through a `tokio::sync::watch` channel
    ///
    /// The receiver always holds the latest result; intermediate results may
    /// be skipped by a slow reader but never reordered.
    pub fn watch<Q: LiveQuery>(self: &Arc<Self>, query: Q) -> LiveWatch<Q::Output> {
        let (sender, receiver) = watch::channel(None);
        let handle = self.subscribe_fn(query, move |value: &Q::Output| {
            sender.send_replace(Some(value.clone()));
        });
        LiveWatch { handle, receiver }
    }

    /// Number of active subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub(crate) fn remove(&self, id: SubscriptionId) {
        let removed = self.write_subscriptions().remove(&id);
        if let Some(subscription) = removed {
            subscription.deactivate();
            tracing::debug!(subscription_id = id.get(), "live query unsubscribed");
        }
    }

    fn write_subscriptions(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<SubscriptionId, Arc<dyn Subscription>>> {
        self.subscriptions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InvalidationObserver for LiveQueryRegistry {
    fn on_invalidated(&self, change: &TableChange) {
        let stale: Vec<Arc<dyn Subscription>> = {
            let subscriptions = self
                .subscriptions
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            subscriptions
                .values()
                .filter(|s| s.reads(change.table))
                .cloned()
                .collect()
        };

        for subscription in stale {
            subscription.refresh(&self.store, false);
        }
    }
}

impl Drop for LiveQueryRegistry {
    fn drop(&mut self) {
        self.store.tracker().unregister(self.observer_id);
    }
}

impl std::fmt::Debug for LiveQueryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQueryRegistry")
            .field("subscriptions", &self.subscription_count())
            .finish_non_exhaustive()
    }
}

/// A subscription whose results land in a watch channel
pub struct LiveWatch<T> {
    handle: LiveQueryHandle<T>,
    receiver: watch::Receiver<Option<T>>,
}

impl<T: Clone> LiveWatch<T> {
    pub fn receiver(&self) -> watch::Receiver<Option<T>> {
        self.receiver.clone()
    }

    /// Wait until a result newer than the last one seen arrives
    ///
    /// Returns `None` once the subscription has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update().clone()
    }

    /// Latest result without waiting
    pub fn current(&self) -> Option<T> {
        self.receiver.borrow().clone()
    }

    pub fn handle(&self) -> &LiveQueryHandle<T> {
        &self.handle
    }
}
