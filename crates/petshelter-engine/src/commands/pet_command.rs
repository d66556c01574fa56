//! The store's mutation command set.

use petshelter_core::model::{NewPet, Pet, PetId};
use petshelter_store::errors::Result;
use petshelter_store::{InsertOutcome, PetStore};

/// A single mutation against the pet store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetCommand {
    Insert(NewPet),
    /// Overwrite all columns of the pet with the same id
    Update(Pet),
    Delete(PetId),
    DeleteAll,
}

impl PetCommand {
    /// Operation name used in logs
    pub fn op_name(&self) -> &'static str {
        match self {
            PetCommand::Insert(_) => "insert_pet",
            PetCommand::Update(_) => "update_pet",
            PetCommand::Delete(_) => "delete_pet",
            PetCommand::DeleteAll => "delete_all_pets",
        }
    }
}

/// Result of applying a [`PetCommand`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetCommandResult {
    Inserted(InsertOutcome),
    /// Rows changed; 0 means no pet had the id
    Updated(usize),
    Deleted(usize),
    Cleared(usize),
}

impl PetCommandResult {
    /// Rows the command changed
    pub fn rows_affected(&self) -> usize {
        match self {
            PetCommandResult::Inserted(outcome) => usize::from(outcome.id().is_some()),
            PetCommandResult::Updated(rows)
            | PetCommandResult::Deleted(rows)
            | PetCommandResult::Cleared(rows) => *rows,
        }
    }
}

/// Apply a command to the store on the calling thread
///
/// # Errors
/// Whatever the underlying store operation returns.
pub fn apply_pet_command(cmd: PetCommand, store: &PetStore) -> Result<PetCommandResult> {
    match cmd {
        PetCommand::Insert(pet) => store.insert(&pet).map(PetCommandResult::Inserted),
        PetCommand::Update(pet) => store.update(&pet).map(PetCommandResult::Updated),
        PetCommand::Delete(id) => store.delete_by_id(id).map(PetCommandResult::Deleted),
        PetCommand::DeleteAll => store.delete_all().map(PetCommandResult::Cleared),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_insert_then_delete() {
        let store = PetStore::open_in_memory().unwrap();

        let inserted = apply_pet_command(PetCommand::Insert(NewPet::new("Toto")), &store).unwrap();
        let id = match &inserted {
            PetCommandResult::Inserted(outcome) => outcome.id().unwrap(),
            other => panic!("unexpected result {:?}", other),
        };
        assert_eq!(inserted.rows_affected(), 1);

        let deleted = apply_pet_command(PetCommand::Delete(id), &store).unwrap();
        assert_eq!(deleted, PetCommandResult::Deleted(1));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_empty_name_is_inserted() {
        let store = PetStore::open_in_memory().unwrap();
        let result = apply_pet_command(PetCommand::Insert(NewPet::new("")), &store).unwrap();
        assert_eq!(result.rows_affected(), 1);
    }

    #[test]
    fn test_rejected_insert_reports_zero_rows() {
        let conn = petshelter_store::db::connect(&petshelter_store::StoreConfig::in_memory())
            .unwrap();
        conn.execute_batch(
            "CREATE TRIGGER pet_readonly BEFORE INSERT ON pet \
             BEGIN SELECT RAISE(ABORT, 'pet table is read-only'); END;",
        )
        .unwrap();
        let store = PetStore::from_connection(conn);

        let result = apply_pet_command(PetCommand::Insert(NewPet::new("Toto")), &store).unwrap();
        assert!(matches!(
            result,
            PetCommandResult::Inserted(InsertOutcome::Rejected { .. })
        ));
        assert_eq!(result.rows_affected(), 0);
    }

    #[test]
    fn test_delete_all_on_empty_store() {
        let store = PetStore::open_in_memory().unwrap();
        let result = apply_pet_command(PetCommand::DeleteAll, &store).unwrap();
        assert_eq!(result, PetCommandResult::Cleared(0));
    }

    #[test]
    fn test_op_names_match_store_logging() {
        assert_eq!(PetCommand::DeleteAll.op_name(), "delete_all_pets");
        assert_eq!(PetCommand::Delete(PetId::new(1)).op_name(), "delete_pet");
    }
}
