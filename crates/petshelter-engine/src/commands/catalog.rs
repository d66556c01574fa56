//! Catalog flow: the pet list and its bulk actions.

use std::sync::Arc;

use petshelter_core::model::{Gender, NewPet, Pet, PetId};
use petshelter_store::errors::Result;
use petshelter_store::{InsertOutcome, PetStore};
use serde::Serialize;

use crate::live::{AllPets, LiveQueryHandle, LiveQueryRegistry};

/// The sample pet added by "insert dummy pet"
pub fn dummy_pet() -> NewPet {
    NewPet::new("Toto")
        .with_breed("Terrier")
        .with_gender(Gender::Male)
        .with_weight(7)
}

/// One line of the catalog list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    pub id: PetId,
    pub name: String,
    /// Breed, or "Unknown breed"
    pub summary: String,
}

impl From<&Pet> for CatalogRow {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name.clone(),
            summary: pet.breed_display().to_string(),
        }
    }
}

impl std::fmt::Display for CatalogRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>4}  {}  ({})", self.id.get(), self.name, self.summary)
    }
}

pub fn catalog_rows(pets: &[Pet]) -> Vec<CatalogRow> {
    pets.iter().map(CatalogRow::from).collect()
}

/// # Errors
/// A storage fault.
pub fn insert_dummy_pet(store: &PetStore) -> Result<InsertOutcome> {
    store.insert(&dummy_pet())
}

/// Remove every pet; returns how many were removed
///
/// # Errors
/// A storage fault.
pub fn delete_all_pets(store: &PetStore) -> Result<usize> {
    let rows = store.delete_all()?;
    tracing::info!(rows_affected = rows, "catalog cleared");
    Ok(rows)
}

/// Keep a rendering of the catalog current
///
/// `f` receives the rows immediately and again after every change; an
/// empty slice means the empty view should be shown.
pub fn watch_catalog<F>(registry: &Arc<LiveQueryRegistry>, f: F) -> LiveQueryHandle<Vec<Pet>>
where
    F: Fn(&[CatalogRow]) + Send + Sync + 'static,
{
    registry.subscribe_fn(AllPets, move |pets: &Vec<Pet>| f(&catalog_rows(pets)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_pet_values() {
        let pet = dummy_pet();
        assert_eq!(pet.name, "Toto");
        assert_eq!(pet.breed.as_deref(), Some("Terrier"));
        assert_eq!(pet.gender, Gender::Male);
        assert_eq!(pet.weight, 7);
    }

    #[test]
    fn test_row_shows_unknown_breed() {
        let pet = NewPet::new("Binx").into_pet(PetId::new(3));
        let row = CatalogRow::from(&pet);
        assert_eq!(row.summary, "Unknown breed");
        assert_eq!(row.to_string(), "   3  Binx  (Unknown breed)");
    }

    #[test]
    fn test_insert_dummy_then_clear() {
        let store = PetStore::open_in_memory().unwrap();
        insert_dummy_pet(&store).unwrap();
        insert_dummy_pet(&store).unwrap();

        let rows = catalog_rows(&store.query_all().unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].summary, "Terrier");

        assert_eq!(delete_all_pets(&store).unwrap(), 2);
        assert_eq!(delete_all_pets(&store).unwrap(), 0);
    }
}
