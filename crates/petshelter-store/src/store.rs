//! The pet record store
//!
//! `PetStore` owns the single SQLite connection behind a mutex. Every
//! operation holds the lock for its whole duration and every mutation runs
//! in its own transaction, so concurrent readers see either the state
//! before or after a write, never a partial one.
//!
//! Mutations that change at least one row bump the store's data version
//! and notify the [`InvalidationTracker`] once the lock is released.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use petshelter_core::errors::ExErrorKind;
use petshelter_core::model::{NewPet, Pet, PetId};
use petshelter_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;

use crate::config::StoreConfig;
use crate::db;
use crate::errors::{from_rusqlite, lock_poisoned, Result};
use crate::invalidation::{ChangeKind, InvalidationTracker, TableChange, PET_TABLE};
use crate::repo::SqlitePetRepo;

/// Result of [`PetStore::insert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written under this id
    Inserted(PetId),
    /// A table constraint refused the row; nothing was written
    Rejected { reason: String },
}

impl InsertOutcome {
    /// The assigned id, if the insert succeeded
    pub fn id(&self) -> Option<PetId> {
        match self {
            InsertOutcome::Inserted(id) => Some(*id),
            InsertOutcome::Rejected { .. } => None,
        }
    }
}

struct StoreInner {
    conn: Connection,
    /// Incremented on every committed change
    version: u64,
}

/// Serialized CRUD over the `pet` table
pub struct PetStore {
    inner: Mutex<StoreInner>,
    tracker: InvalidationTracker,
}

impl PetStore {
    /// Open (creating and migrating if needed) the store described by `config`
    ///
    /// # Errors
    /// `StorageUnavailable` if a file location cannot be opened or migrated.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let conn = db::connect(config)?;
        tracing::info!(location = ?config.location, "opened pet store");
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory store
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    /// Wrap an already migrated connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            inner: Mutex::new(StoreInner { conn, version: 0 }),
            tracker: InvalidationTracker::new(),
        }
    }

    /// Change notification hub for this store
    pub fn tracker(&self) -> &InvalidationTracker {
        &self.tracker
    }

    /// Current data version; starts at 0 and grows by one per committed change
    pub fn version(&self) -> Result<u64> {
        Ok(self.lock("version")?.version)
    }

    /// Persist a new pet and return its id
    ///
    /// A constraint violation raised by SQLite (a CHECK or a trigger) is
    /// reported as [`InsertOutcome::Rejected`], not as an error. An empty
    /// name is a valid name.
    pub fn insert(&self, pet: &NewPet) -> Result<InsertOutcome> {
        let start = Instant::now();
        log_op_start!("insert_pet");

        let result = self.write(ChangeKind::Insert, |conn| {
            let id = SqlitePetRepo::insert_pet(conn, pet)?;
            Ok((id, 1))
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(id) => {
                log_op_end!("insert_pet", duration_ms = duration_ms, pet_id = id.get());
                Ok(InsertOutcome::Inserted(id))
            }
            Err(err) if err.kind() == ExErrorKind::ConstraintViolation => {
                tracing::warn!(op = "insert_pet", reason = err.message(), "insert rejected");
                log_op_end!("insert_pet", duration_ms = duration_ms, rejected = true);
                Ok(InsertOutcome::Rejected {
                    reason: err.message().to_string(),
                })
            }
            Err(err) => {
                log_op_error!("insert_pet", err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }

    /// Overwrite every column of the stored pet with `pet.id`
    ///
    /// Returns 1 when the row was updated and 0 when no row has that id.
    ///
    /// # Errors
    /// `ConstraintViolation` if the new values break a table constraint;
    /// the stored row is left unchanged.
    pub fn update(&self, pet: &Pet) -> Result<usize> {
        let pet_id = pet.id.get();
        self.logged_write("update_pet", Some(pet_id), ChangeKind::Update, |conn| {
            let rows = SqlitePetRepo::update_pet(conn, pet)?;
            Ok((rows, rows))
        })
    }

    /// Delete the pet with `id`; returns 1 if removed and 0 if absent
    pub fn delete_by_id(&self, id: PetId) -> Result<usize> {
        self.logged_write("delete_pet", Some(id.get()), ChangeKind::Delete, |conn| {
            let rows = SqlitePetRepo::delete_pet(conn, id)?;
            Ok((rows, rows))
        })
    }

    /// Delete every pet; returns how many rows were removed
    ///
    /// Clearing an empty table is a no-op that returns 0.
    pub fn delete_all(&self) -> Result<usize> {
        self.logged_write("delete_all_pets", None, ChangeKind::DeleteAll, |conn| {
            let rows = SqlitePetRepo::delete_all_pets(conn)?;
            Ok((rows, rows))
        })
    }

    /// Every pet, in id order
    pub fn query_all(&self) -> Result<Vec<Pet>> {
        self.read(SqlitePetRepo::list_pets).map(|(_, pets)| pets)
    }

    /// The pet with `id`, if any
    pub fn query_by_id(&self, id: PetId) -> Result<Option<Pet>> {
        self.read(|conn| SqlitePetRepo::get_pet(conn, id))
            .map(|(_, pet)| pet)
    }

    /// Number of stored pets
    pub fn count(&self) -> Result<usize> {
        self.read(SqlitePetRepo::count_pets).map(|(_, n)| n)
    }

    /// Run a read under the store lock, returning the data version it saw
    ///
    /// The version and the result come from the same locked section, so a
    /// caller can order results from concurrent reads by version.
    pub fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<(u64, T)> {
        let inner = self.lock("read")?;
        let value = f(&inner.conn)?;
        Ok((inner.version, value))
    }

    fn logged_write(
        &self,
        op: &'static str,
        pet_id: Option<i64>,
        kind: ChangeKind,
        f: impl FnOnce(&Connection) -> Result<(usize, usize)>,
    ) -> Result<usize> {
        let start = Instant::now();
        log_op_start!(op, pet_id = pet_id);

        let result = self.write(kind, f);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(rows) => {
                log_op_end!(op, duration_ms = duration_ms, rows_affected = *rows);
            }
            Err(err) => {
                log_op_error!(op, err.clone(), duration_ms = duration_ms);
            }
        }
        result
    }

    /// Run `f` in a transaction; `f` returns its value and the rows it changed
    fn write<T>(
        &self,
        kind: ChangeKind,
        f: impl FnOnce(&Connection) -> Result<(T, usize)>,
    ) -> Result<T> {
        let (value, change) = {
            let mut inner = self.lock("write")?;
            let tx = inner.conn.transaction().map_err(from_rusqlite)?;
            let (value, rows_affected) = f(&*tx)?;
            tx.commit().map_err(from_rusqlite)?;

            let change = (rows_affected > 0).then(|| {
                inner.version += 1;
                TableChange {
                    table: PET_TABLE,
                    kind,
                    version: inner.version,
                    rows_affected,
                }
            });
            (value, change)
        };

        if let Some(change) = change {
            self.tracker.notify(&change);
        }
        Ok(value)
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, StoreInner>> {
        self.inner.lock().map_err(|_| lock_poisoned(op))
    }
}

impl std::fmt::Debug for PetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let version = self.inner.try_lock().ok().map(|inner| inner.version);
        f.debug_struct("PetStore")
            .field("version", &version)
            .finish_non_exhaustive()
    }
}
