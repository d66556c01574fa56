//! PetShelter Store - Persistence layer for pet records
//!
//! Provides:
//! - SQLite schema with a migrations framework
//! - `PetStore`: serialized CRUD over the `pet` table
//! - Change notification through an invalidation tracker
//! - A lazily created process-wide store instance

pub mod config;
pub mod db;
pub mod errors;
pub mod global;
pub mod invalidation;
pub mod migrations;
pub mod repo;
pub mod store;

// Re-export key types
pub use config::{StoreConfig, StoreLocation};
pub use errors::Result;
pub use invalidation::{ChangeKind, InvalidationObserver, InvalidationTracker, ObserverId, TableChange};
pub use store::{InsertOutcome, PetStore};
