//! PetShelter Core - domain model and shared facilities
//!
//! This crate provides:
//! - The pet record model (`NewPet` before insert, `Pet` after)
//! - Editor form parsing and field validation
//! - The structured error facility (`ExError`, `ExErrorKind`)
//! - The structured logging facility and its macros

pub mod errors;
pub mod form;
pub mod logging_facility;
pub mod model;
pub mod rules;

// Used by the logging macros so callers don't need a direct dependency
pub use petshelter_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, PetShelterError, Result};
pub use form::PetForm;
pub use model::{Gender, NewPet, Pet, PetId};
