//! Catalog commands: list, show and the bulk actions

use clap::Args;
use petshelter_core::errors::PetShelterError;
use petshelter_core::model::PetId;
use petshelter_engine::commands::catalog::{self, CatalogRow};
use petshelter_engine::Shelter;
use petshelter_store::InsertOutcome;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print the pets as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,

    /// Print the pet as a JSON object
    #[arg(long)]
    pub json: bool,
}

pub fn list(shelter: &Shelter, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pets = shelter.store().query_all()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pets)?);
        return Ok(());
    }

    if pets.is_empty() {
        println!("The shelter is empty. Add a pet with `petshelter add`.");
        return Ok(());
    }
    for row in catalog::catalog_rows(&pets) {
        println!("{}", row);
    }
    Ok(())
}

pub fn show(shelter: &Shelter, args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pet = shelter
        .store()
        .query_by_id(PetId::new(args.id))?
        .ok_or(PetShelterError::PetNotFound { pet_id: args.id })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pet)?);
        return Ok(());
    }

    let row = CatalogRow::from(&pet);
    println!("id:     {}", row.id);
    println!("name:   {}", row.name);
    println!("breed:  {}", row.summary);
    println!("gender: {}", pet.gender.label());
    println!("weight: {}", pet.weight);
    Ok(())
}

pub fn delete_all(shelter: &Shelter) -> Result<(), Box<dyn std::error::Error>> {
    let rows = catalog::delete_all_pets(shelter.store())?;
    println!("Deleted {} pets", rows);
    Ok(())
}

pub fn insert_dummy(shelter: &Shelter) -> Result<(), Box<dyn std::error::Error>> {
    match catalog::insert_dummy_pet(shelter.store())? {
        InsertOutcome::Inserted(id) => {
            println!("Pet saved with id {}", id);
            Ok(())
        }
        InsertOutcome::Rejected { reason } => Err(format!("Error saving pet: {}", reason).into()),
    }
}
