//! Editor commands: add, edit and delete a single pet

use clap::Args;
use petshelter_core::form::PetForm;
use petshelter_core::model::{Gender, PetId};
use petshelter_engine::commands::editor::{DeleteOutcome, EditorSession, SaveOutcome};
use petshelter_engine::Shelter;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub breed: String,

    /// Whole kilograms; empty means 0
    #[arg(long, default_value = "")]
    pub weight: String,

    /// unknown, male or female (or 0, 1, 2)
    #[arg(long, default_value = "unknown")]
    pub gender: Gender,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub breed: Option<String>,

    #[arg(long)]
    pub weight: Option<String>,

    #[arg(long)]
    pub gender: Option<Gender>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,
}

pub fn add(shelter: &Shelter, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let form = PetForm {
        name: args.name,
        breed: args.breed,
        weight: args.weight,
        gender: args.gender,
    };
    report(EditorSession::adding().save(shelter.store(), &form)?)
}

pub fn edit(shelter: &Shelter, args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = EditorSession::editing(PetId::new(args.id));
    let mut form = session.load(shelter.store())?;

    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(breed) = args.breed {
        form.breed = breed;
    }
    if let Some(weight) = args.weight {
        form.weight = weight;
    }
    if let Some(gender) = args.gender {
        form.gender = gender;
    }

    report(session.save(shelter.store(), &form)?)
}

pub fn delete(shelter: &Shelter, args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = EditorSession::editing(PetId::new(args.id)).delete(shelter.store())?;
    match outcome {
        DeleteOutcome::Deleted(_) => {
            println!("{}", outcome.message());
            Ok(())
        }
        DeleteOutcome::Missing(_) => Err(outcome.message().into()),
    }
}

fn report(outcome: SaveOutcome) -> Result<(), Box<dyn std::error::Error>> {
    if outcome.is_success() {
        println!("{}", outcome.message());
        Ok(())
    } else {
        Err(outcome.message().into())
    }
}
