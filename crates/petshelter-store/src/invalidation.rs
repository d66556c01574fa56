//! Invalidation tracker: table-level change notification.
//!
//! Every committed mutation that changes at least one row produces a
//! [`TableChange`]. Observers register with the tracker and are called
//! after the store has released its connection lock, so an observer may
//! read from (or write to) the store from inside the callback.
//!
//! Observers are held weakly: dropping the last strong reference to an
//! observer unregisters it implicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, Weak};

/// Name of the single table the store owns
pub const PET_TABLE: &str = "pet";

/// What kind of mutation produced a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    DeleteAll,
}

/// A committed change to a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChange {
    pub table: &'static str,
    pub kind: ChangeKind,
    /// Store data version after the change was committed
    pub version: u64,
    pub rows_affected: usize,
}

/// Receives table changes from an [`InvalidationTracker`]
pub trait InvalidationObserver: Send + Sync {
    fn on_invalidated(&self, change: &TableChange);
}

/// Identifier returned by [`InvalidationTracker::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of observers interested in table changes
#[derive(Default)]
pub struct InvalidationTracker {
    observers: RwLock<Vec<(ObserverId, Weak<dyn InvalidationObserver>)>>,
    next_id: AtomicU64,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it stays registered until unregistered or dropped
    pub fn register(&self, observer: Weak<dyn InvalidationObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        observers.push((id, observer));
        id
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        observers.iter().filter(|(_, o)| o.strong_count() > 0).count()
    }

    /// Deliver `change` to every live observer
    ///
    /// The observer list is snapshotted first so observers can register or
    /// unregister from inside the callback.
    pub fn notify(&self, change: &TableChange) {
        let live: Vec<_> = {
            let mut observers = self
                .observers
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            observers.retain(|(_, o)| o.strong_count() > 0);
            observers.iter().filter_map(|(_, o)| o.upgrade()).collect()
        };

        tracing::trace!(
            table = change.table,
            version = change.version,
            observers = live.len(),
            "table invalidated"
        );

        for observer in live {
            observer.on_invalidated(change);
        }
    }
}
