//! PetShelter Engine - Orchestration layer
//!
//! Coordinates the record store with everything that sits on top of it:
//! - `live`: push-based query subscriptions re-evaluated on every write
//! - `commands`: the mutation command set plus the editor and catalog flows
//! - `service`: off-thread execution of commands for interactive callers
//! - `Shelter`: the long-lived owner tying a store to its live registry

pub mod commands;
pub mod live;
pub mod service;
pub mod shelter;

pub use live::{AllPets, LiveQuery, LiveQueryHandle, LiveQueryRegistry, PetById};
pub use service::PetService;
pub use shelter::Shelter;
