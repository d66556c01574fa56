//! Process-wide store instance
//!
//! For callers that cannot thread an `Arc<PetStore>` through from startup.
//! The first successful call opens the store; every later call, from any
//! thread, gets the same instance back. Concurrent first calls are
//! serialized so exactly one connection is ever opened.

use std::sync::{Arc, Mutex, OnceLock};

use crate::config::StoreConfig;
use crate::errors::{lock_poisoned, Result};
use crate::store::PetStore;

static INSTANCE: OnceLock<Arc<PetStore>> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Get the process-wide store, opening it with `config` on first use
///
/// `config` is ignored once the instance exists. A failed open leaves no
/// instance behind, so a later call may retry.
///
/// # Errors
/// Whatever [`PetStore::open`] returns for the first successful caller's
/// config; `Concurrency` if a previous initializer panicked.
pub fn instance(config: &StoreConfig) -> Result<Arc<PetStore>> {
    if let Some(store) = INSTANCE.get() {
        return Ok(Arc::clone(store));
    }

    let _guard = INIT_LOCK.lock().map_err(|_| lock_poisoned("global_instance"))?;

    if let Some(store) = INSTANCE.get() {
        return Ok(Arc::clone(store));
    }

    let store = Arc::new(PetStore::open(config)?);
    tracing::debug!("initialized process-wide pet store");
    Ok(Arc::clone(INSTANCE.get_or_init(|| store)))
}

/// The process-wide store, if it has been opened
pub fn get() -> Option<Arc<PetStore>> {
    INSTANCE.get().cloned()
}
