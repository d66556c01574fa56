use std::sync::Arc;

use petshelter_core::model::{Pet, PetId};
use petshelter_store::errors::Result;
use petshelter_store::{global, PetStore, StoreConfig};
use tokio::runtime::Handle;

use crate::live::{AllPets, LiveQueryHandle, LiveQueryRegistry, PetById};
use crate::service::PetService;

/// Long-lived owner of a store and the live queries over it
///
/// Cloning is cheap; clones share the store and the registry.
#[derive(Debug, Clone)]
pub struct Shelter {
    store: Arc<PetStore>,
    live: Arc<LiveQueryRegistry>,
}

impl Shelter {
    /// Open a store of its own
    ///
    /// # Errors
    /// `StorageUnavailable` if the database cannot be opened.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Ok(Self::from_store(Arc::new(PetStore::open(config)?)))
    }

    /// Use the process-wide store, opening it with `config` if needed
    ///
    /// # Errors
    /// `StorageUnavailable` if the first open fails.
    pub fn global(config: &StoreConfig) -> Result<Self> {
        Ok(Self::from_store(global::instance(config)?))
    }

    pub fn from_store(store: Arc<PetStore>) -> Self {
        let live = LiveQueryRegistry::new(Arc::clone(&store));
        Self { store, live }
    }

    pub fn store(&self) -> &Arc<PetStore> {
        &self.store
    }

    pub fn live(&self) -> &Arc<LiveQueryRegistry> {
        &self.live
    }

    /// Background command runner bound to `runtime`
    pub fn service(&self, runtime: Handle) -> PetService {
        PetService::new(Arc::clone(&self.store), runtime)
    }

    pub fn watch_all<F>(&self, f: F) -> LiveQueryHandle<Vec<Pet>>
    where
        F: Fn(&Vec<Pet>) + Send + Sync + 'static,
    {
        self.live.subscribe_fn(AllPets, f)
    }

    pub fn watch_pet<F>(&self, id: PetId, f: F) -> LiveQueryHandle<Option<Pet>>
    where
        F: Fn(&Option<Pet>) + Send + Sync + 'static,
    {
        self.live.subscribe_fn(PetById(id), f)
    }
}
