//! Mutation commands and the two screen flows built on them.

pub mod catalog;
pub mod editor;
pub mod pet_command;

pub use pet_command::{apply_pet_command, PetCommand, PetCommandResult};
