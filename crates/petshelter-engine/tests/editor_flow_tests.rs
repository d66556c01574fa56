//! Editor and catalog flows driven end to end over a shared store.

mod common;

use std::sync::{Arc, Mutex};

use petshelter_core::errors::ExErrorKind;
use petshelter_core::form::PetForm;
use petshelter_core::model::{Gender, Pet, PetId};
use petshelter_engine::commands::catalog::{self, CatalogRow};
use petshelter_engine::commands::editor::{DeleteOutcome, EditorSession, SaveOutcome};
use petshelter_engine::{LiveQueryHandle, Shelter};
use petshelter_store::StoreConfig;

fn shelter() -> Shelter {
    Shelter::open(&StoreConfig::in_memory()).unwrap()
}

fn form(name: &str, breed: &str, weight: &str, gender: Gender) -> PetForm {
    PetForm {
        name: name.to_string(),
        breed: breed.to_string(),
        weight: weight.to_string(),
        gender,
    }
}

type Rows = Arc<Mutex<Vec<CatalogRow>>>;

fn watch_rows(shelter: &Shelter) -> (Rows, LiveQueryHandle<Vec<Pet>>) {
    let rows = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&rows);
    let handle = catalog::watch_catalog(shelter.live(), move |current: &[CatalogRow]| {
        *sink.lock().unwrap() = current.to_vec();
    });
    (rows, handle)
}

#[test]
fn test_add_pet_shows_up_in_catalog() {
    let shelter = shelter();
    let (rows, _handle) = watch_rows(&shelter);
    assert!(rows.lock().unwrap().is_empty());

    let outcome = EditorSession::adding()
        .save(shelter.store(), &form("Toto", "", "7", Gender::Male))
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Inserted(PetId::new(1)));
    assert!(outcome.is_success());

    let rows = rows.lock().unwrap().clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Toto");
    assert_eq!(rows[0].summary, "Unknown breed");
}

#[test]
fn test_edit_existing_pet() {
    let shelter = shelter();
    let id = catalog::insert_dummy_pet(shelter.store())
        .unwrap()
        .id()
        .unwrap();

    let session = EditorSession::editing(id);
    let mut loaded = session.load(shelter.store()).unwrap();
    assert_eq!(loaded, form("Toto", "Terrier", "7", Gender::Male));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _handle = session
        .watch(shelter.live(), move |pet| {
            sink.lock().unwrap().push(pet.as_ref().map(|p| p.weight));
        })
        .unwrap();

    loaded.weight = "9".to_string();
    let outcome = session.save(shelter.store(), &loaded).unwrap();

    assert_eq!(outcome, SaveOutcome::Updated(id));
    assert_eq!(*seen.lock().unwrap(), vec![Some(7), Some(9)]);
}

#[test]
fn test_saving_a_pet_deleted_elsewhere_reports_update_missed() {
    let shelter = shelter();
    let id = catalog::insert_dummy_pet(shelter.store())
        .unwrap()
        .id()
        .unwrap();
    let session = EditorSession::editing(id);
    let loaded = session.load(shelter.store()).unwrap();

    catalog::delete_all_pets(shelter.store()).unwrap();
    let outcome = session.save(shelter.store(), &loaded).unwrap();

    assert_eq!(outcome, SaveOutcome::UpdateMissed(id));
    assert!(!outcome.is_success());
    assert_eq!(shelter.store().count().unwrap(), 0);
}

#[test]
fn test_editing_to_blank_name_saves_the_empty_name() {
    let shelter = shelter();
    let id = catalog::insert_dummy_pet(shelter.store())
        .unwrap()
        .id()
        .unwrap();

    let outcome = EditorSession::editing(id)
        .save(shelter.store(), &form(" ", "", "", Gender::Unknown))
        .unwrap();

    assert_eq!(outcome, SaveOutcome::Updated(id));
    let pet = shelter.store().query_by_id(id).unwrap().unwrap();
    assert_eq!(pet.name, "");
    assert_eq!(pet.breed, None);
    assert_eq!(pet.weight, 0);
}

#[test]
fn test_add_with_only_breed_is_saved() {
    let shelter = shelter();

    let outcome = EditorSession::adding()
        .save(shelter.store(), &form("", "Terrier", "3", Gender::Unknown))
        .unwrap();

    assert_eq!(outcome, SaveOutcome::Inserted(PetId::new(1)));
    assert_eq!(shelter.store().query_all().unwrap()[0].breed_display(), "Terrier");
}

#[test]
fn test_store_refusal_is_reported_as_rejected() {
    let store = common::quarantined_store();

    let outcome = EditorSession::adding()
        .save(&store, &form("Patch", common::QUARANTINED, "", Gender::Unknown))
        .unwrap();

    assert!(matches!(outcome, SaveOutcome::Rejected { .. }));
    assert!(!outcome.is_success());
    assert!(outcome.message().starts_with("Error saving pet"));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_store_refusal_on_update_is_an_error() {
    let store = common::quarantined_store();
    let id = catalog::insert_dummy_pet(&store).unwrap().id().unwrap();
    let session = EditorSession::editing(id);

    let mut edited = session.load(&store).unwrap();
    edited.breed = common::QUARANTINED.to_string();
    assert!(EditorSession::has_unsaved_changes(
        &session.load(&store).unwrap(),
        &edited
    ));
    let err = session.save(&store, &edited).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(
        store.query_by_id(id).unwrap().unwrap().breed.as_deref(),
        Some("Terrier")
    );
}

#[test]
fn test_delete_from_editor() {
    let shelter = shelter();
    let id = catalog::insert_dummy_pet(shelter.store())
        .unwrap()
        .id()
        .unwrap();
    let session = EditorSession::editing(id);
    assert!(session.can_delete());

    assert_eq!(session.delete(shelter.store()).unwrap(), DeleteOutcome::Deleted(id));
    assert_eq!(session.delete(shelter.store()).unwrap(), DeleteOutcome::Missing(id));
}

#[test]
fn test_adding_session_has_nothing_to_watch() {
    let shelter = shelter();
    assert!(EditorSession::adding()
        .watch(shelter.live(), |_| {})
        .is_none());
    assert_eq!(
        EditorSession::adding().load(shelter.store()).unwrap(),
        PetForm::default()
    );
}

#[test]
fn test_catalog_delete_all_empties_view() {
    let shelter = shelter();
    let (rows, _handle) = watch_rows(&shelter);
    catalog::insert_dummy_pet(shelter.store()).unwrap();
    catalog::insert_dummy_pet(shelter.store()).unwrap();
    assert_eq!(rows.lock().unwrap().len(), 2);

    assert_eq!(catalog::delete_all_pets(shelter.store()).unwrap(), 2);
    assert!(rows.lock().unwrap().is_empty());
}
