//! Repository layer mapping pet records to SQL

pub mod pet_repo;

pub use pet_repo::SqlitePetRepo;
