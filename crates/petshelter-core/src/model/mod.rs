pub mod gender;
pub mod pet;

pub use gender::Gender;
pub use pet::{NewPet, Pet, PetId, UNKNOWN_BREED_LABEL};
