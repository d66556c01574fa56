use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

use petshelter_core::errors::ExError;

use super::registry::{LiveQueryRegistry, SubscriptionId};

/// Receives the results of a live query
///
/// Called on whichever thread committed the write that made the query
/// stale, or on the subscribing thread for the initial result. The store is
/// not locked during the call, so implementations may read from it, write
/// to it, or unsubscribe.
pub trait LiveQueryCallback<T>: Send + Sync + 'static {
    fn on_change(&self, value: &T);

    /// Called when re-running the query failed; the subscription stays active
    fn on_error(&self, error: &ExError) {
        tracing::warn!(
            err_code = error.code(),
            message = error.message(),
            "live query evaluation failed"
        );
    }
}

/// Adapts a closure into a [`LiveQueryCallback`]
pub(crate) struct FnCallback<F>(pub(crate) F);

impl<T, F> LiveQueryCallback<T> for FnCallback<F>
where
    F: Fn(&T) + Send + Sync + 'static,
{
    fn on_change(&self, value: &T) {
        (self.0)(value)
    }
}

/// State shared between a subscription and its handle
pub(crate) struct Shared<T> {
    pub(crate) active: AtomicBool,
    pub(crate) latest: RwLock<Option<T>>,
}

impl<T> Shared<T> {
    pub(crate) fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
            latest: RwLock::new(None),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Owns one subscription; dropping it unsubscribes
#[must_use = "dropping the handle unsubscribes immediately"]
pub struct LiveQueryHandle<T> {
    id: SubscriptionId,
    registry: Weak<LiveQueryRegistry>,
    shared: Arc<Shared<T>>,
}

impl<T> LiveQueryHandle<T> {
    pub(crate) fn new(
        id: SubscriptionId,
        registry: Weak<LiveQueryRegistry>,
        shared: Arc<Shared<T>>,
    ) -> Self {
        Self {
            id,
            registry,
            shared,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    /// Stop delivery; calling it again is a no-op
    ///
    /// Safe to call from inside the subscription's own callback.
    pub fn unsubscribe(&self) {
        if !self.shared.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl<T: Clone> LiveQueryHandle<T> {
    /// Most recent result delivered to this subscription
    pub fn latest(&self) -> Option<T> {
        self.shared
            .latest
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl<T> Drop for LiveQueryHandle<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl<T> std::fmt::Debug for LiveQueryHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQueryHandle")
            .field("id", &self.id)
            .field("active", &self.shared.is_active())
            .finish()
    }
}
