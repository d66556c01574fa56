use petshelter_core::model::{Pet, PetId};
use petshelter_store::invalidation::PET_TABLE;
use petshelter_store::repo::SqlitePetRepo;
use petshelter_store::{PetStore, Result};

/// A query that can be re-run whenever the tables it reads change
pub trait LiveQuery: Send + Sync + 'static {
    type Output: Clone + PartialEq + Send + Sync + 'static;

    /// Short label used in logs
    fn label(&self) -> String;

    /// Tables whose changes make this query stale
    fn tables(&self) -> &'static [&'static str] {
        &[PET_TABLE]
    }

    /// Run the query, returning the store data version it observed
    fn run(&self, store: &PetStore) -> Result<(u64, Self::Output)>;
}

/// Every pet, in id order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllPets;

impl LiveQuery for AllPets {
    type Output = Vec<Pet>;

    fn label(&self) -> String {
        "all_pets".to_string()
    }

    fn run(&self, store: &PetStore) -> Result<(u64, Vec<Pet>)> {
        store.read(SqlitePetRepo::list_pets)
    }
}

/// A single pet; `None` while no row has the id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetById(pub PetId);

impl LiveQuery for PetById {
    type Output = Option<Pet>;

    fn label(&self) -> String {
        format!("pet_by_id:{}", self.0)
    }

    fn run(&self, store: &PetStore) -> Result<(u64, Option<Pet>)> {
        let id = self.0;
        store.read(|conn| SqlitePetRepo::get_pet(conn, id))
    }
}
