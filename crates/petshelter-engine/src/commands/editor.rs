//! Editor flow: add a new pet or edit an existing one.
//!
//! An [`EditorSession`] is opened either for a new pet or for an existing
//! id. Saving turns the raw [`PetForm`] into an insert or an update;
//! deleting is only possible once the pet exists.

use std::sync::Arc;

use petshelter_core::errors::PetShelterError;
use petshelter_core::form::PetForm;
use petshelter_core::model::{Pet, PetId};
use petshelter_store::errors::Result;
use petshelter_store::{InsertOutcome, PetStore};

use super::pet_command::{apply_pet_command, PetCommand, PetCommandResult};
use crate::live::{LiveQueryHandle, LiveQueryRegistry, PetById};

/// Which pet an editor session is working on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Adding,
    Editing(PetId),
}

/// What happened when the editor saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted(PetId),
    Updated(PetId),
    /// New pet with an entirely blank form; nothing was written
    NothingToSave,
    /// The pet being edited no longer exists
    UpdateMissed(PetId),
    /// The store refused the new pet
    Rejected { reason: String },
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SaveOutcome::Inserted(_) | SaveOutcome::Updated(_) | SaveOutcome::NothingToSave
        )
    }

    /// One-line message for the user
    pub fn message(&self) -> String {
        match self {
            SaveOutcome::Inserted(id) => format!("Pet saved with id {}", id),
            SaveOutcome::Updated(id) => format!("Pet {} updated", id),
            SaveOutcome::NothingToSave => "Nothing to save".to_string(),
            SaveOutcome::UpdateMissed(id) => format!("Error updating pet {}", id),
            SaveOutcome::Rejected { reason } => format!("Error saving pet: {}", reason),
        }
    }
}

/// Result of deleting from the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(PetId),
    /// Someone else already removed it
    Missing(PetId),
}

impl DeleteOutcome {
    pub fn message(&self) -> String {
        match self {
            DeleteOutcome::Deleted(id) => format!("Pet {} deleted", id),
            DeleteOutcome::Missing(id) => format!("Error deleting pet {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSession {
    mode: EditorMode,
}

impl EditorSession {
    pub fn adding() -> Self {
        Self {
            mode: EditorMode::Adding,
        }
    }

    pub fn editing(id: PetId) -> Self {
        Self {
            mode: EditorMode::Editing(id),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Delete is only offered for a pet that already exists
    pub fn can_delete(&self) -> bool {
        matches!(self.mode, EditorMode::Editing(_))
    }

    /// Initial form contents
    ///
    /// # Errors
    /// `NotFound` when editing an id that has no row.
    pub fn load(&self, store: &PetStore) -> Result<PetForm> {
        match self.mode {
            EditorMode::Adding => Ok(PetForm::default()),
            EditorMode::Editing(id) => store
                .query_by_id(id)?
                .map(|pet| PetForm::from_pet(&pet))
                .ok_or_else(|| PetShelterError::PetNotFound { pet_id: id.get() }.into()),
        }
    }

    /// Follow the edited pet so the form can refresh when it changes
    ///
    /// Returns `None` for a new pet.
    pub fn watch<F>(
        &self,
        registry: &Arc<LiveQueryRegistry>,
        f: F,
    ) -> Option<LiveQueryHandle<Option<Pet>>>
    where
        F: Fn(&Option<Pet>) + Send + Sync + 'static,
    {
        match self.mode {
            EditorMode::Adding => None,
            EditorMode::Editing(id) => Some(registry.subscribe_fn(PetById(id), f)),
        }
    }

    /// The command a save of `form` would run
    ///
    /// `Ok(None)` when a new pet's form is entirely blank.
    ///
    /// # Errors
    /// `InvalidWeight` when the weight does not parse.
    pub fn command_for(&self, form: &PetForm) -> Result<Option<PetCommand>> {
        if self.mode == EditorMode::Adding && form.is_blank() {
            return Ok(None);
        }
        let pet = form.to_new_pet()?;
        Ok(Some(match self.mode {
            EditorMode::Adding => PetCommand::Insert(pet),
            EditorMode::Editing(id) => PetCommand::Update(pet.into_pet(id)),
        }))
    }

    /// Validate and persist the form
    ///
    /// # Errors
    /// Field validation errors, a constraint violation on update, or a
    /// storage fault.
    pub fn save(&self, store: &PetStore, form: &PetForm) -> Result<SaveOutcome> {
        let Some(command) = self.command_for(form)? else {
            tracing::debug!("blank form, nothing to save");
            return Ok(SaveOutcome::NothingToSave);
        };
        let outcome = Self::outcome(self.mode, apply_pet_command(command, store)?);
        tracing::info!(outcome = ?outcome, "editor save");
        Ok(outcome)
    }

    /// True when `current` differs from the form as it was loaded
    ///
    /// Surrounding whitespace is ignored, since saving trims it anyway.
    pub fn has_unsaved_changes(loaded: &PetForm, current: &PetForm) -> bool {
        loaded.name.trim() != current.name.trim()
            || loaded.breed.trim() != current.breed.trim()
            || loaded.weight.trim() != current.weight.trim()
            || loaded.gender != current.gender
    }

    /// Delete the pet being edited
    ///
    /// # Errors
    /// `InvalidInput` when the session is for a new pet.
    pub fn delete(&self, store: &PetStore) -> Result<DeleteOutcome> {
        let EditorMode::Editing(id) = self.mode else {
            return Err(PetShelterError::UnsavedPet.into());
        };
        let rows = store.delete_by_id(id)?;
        Ok(if rows > 0 {
            DeleteOutcome::Deleted(id)
        } else {
            DeleteOutcome::Missing(id)
        })
    }

    pub(crate) fn outcome(mode: EditorMode, result: PetCommandResult) -> SaveOutcome {
        match (mode, result) {
            (_, PetCommandResult::Inserted(InsertOutcome::Inserted(id))) => {
                SaveOutcome::Inserted(id)
            }
            (_, PetCommandResult::Inserted(InsertOutcome::Rejected { reason })) => {
                SaveOutcome::Rejected { reason }
            }
            (EditorMode::Editing(id), PetCommandResult::Updated(rows)) if rows > 0 => {
                SaveOutcome::Updated(id)
            }
            (EditorMode::Editing(id), _) => SaveOutcome::UpdateMissed(id),
            (EditorMode::Adding, other) => SaveOutcome::Rejected {
                reason: format!("unexpected result {:?}", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petshelter_core::errors::ExErrorKind;
    use petshelter_core::model::Gender;

    fn form(name: &str, breed: &str, weight: &str) -> PetForm {
        PetForm {
            name: name.to_string(),
            breed: breed.to_string(),
            weight: weight.to_string(),
            gender: Gender::Unknown,
        }
    }

    #[test]
    fn test_blank_new_pet_is_not_saved() {
        let store = PetStore::open_in_memory().unwrap();
        let outcome = EditorSession::adding()
            .save(&store, &form("  ", "", " "))
            .unwrap();
        assert_eq!(outcome, SaveOutcome::NothingToSave);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_save_trims_and_inserts() {
        let store = PetStore::open_in_memory().unwrap();
        let outcome = EditorSession::adding()
            .save(&store, &form("  Toto ", " Terrier ", ""))
            .unwrap();
        let id = match outcome {
            SaveOutcome::Inserted(id) => id,
            other => panic!("expected insert, got {:?}", other),
        };

        let pet = store.query_by_id(id).unwrap().unwrap();
        assert_eq!(pet.name, "Toto");
        assert_eq!(pet.breed.as_deref(), Some("Terrier"));
        assert_eq!(pet.weight, 0);
    }

    #[test]
    fn test_blank_name_with_other_fields_is_saved() {
        let store = PetStore::open_in_memory().unwrap();
        let outcome = EditorSession::adding()
            .save(&store, &form("", "Terrier", "3"))
            .unwrap();
        let id = match outcome {
            SaveOutcome::Inserted(id) => id,
            other => panic!("expected insert, got {:?}", other),
        };

        let pet = store.query_by_id(id).unwrap().unwrap();
        assert_eq!(pet.name, "");
        assert_eq!(pet.breed.as_deref(), Some("Terrier"));
        assert_eq!(pet.weight, 3);
    }

    #[test]
    fn test_unsaved_changes_tracking() {
        let loaded = form("Toto", "Terrier", "7");
        assert!(!EditorSession::has_unsaved_changes(&loaded, &loaded.clone()));
        assert!(!EditorSession::has_unsaved_changes(
            &loaded,
            &form(" Toto ", "Terrier ", "7")
        ));
        assert!(EditorSession::has_unsaved_changes(
            &loaded,
            &form("Toto", "Terrier", "9")
        ));
        assert!(EditorSession::has_unsaved_changes(
            &loaded,
            &PetForm {
                gender: Gender::Female,
                ..loaded.clone()
            }
        ));
        assert!(!EditorSession::has_unsaved_changes(
            &PetForm::default(),
            &PetForm::default()
        ));
    }

    #[test]
    fn test_bad_weight_is_an_error() {
        let store = PetStore::open_in_memory().unwrap();
        let err = EditorSession::adding()
            .save(&store, &form("Toto", "", "-3"))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidWeight);
    }

    #[test]
    fn test_delete_requires_existing_pet() {
        let store = PetStore::open_in_memory().unwrap();
        let session = EditorSession::adding();
        assert!(!session.can_delete());
        let err = session.delete(&store).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_load_missing_pet_is_not_found() {
        let store = PetStore::open_in_memory().unwrap();
        let err = EditorSession::editing(PetId::new(42))
            .load(&store)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }
}
