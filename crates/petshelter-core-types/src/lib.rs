//! Core types shared across PetShelter facilities
//!
//! Holds the canonical field keys and event names used by the error and
//! logging facilities so that every crate emits the same structured shape.

pub mod schema;
