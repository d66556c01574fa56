use petshelter_store::{db, PetStore, StoreConfig};

/// Breed refused by the triggers of [`quarantined_store`]
#[allow(dead_code)]
pub const QUARANTINED: &str = "Quarantined";

/// In-memory store whose connection aborts any insert or update that sets
/// the breed to [`QUARANTINED`], surfacing as a SQLite constraint failure
#[allow(dead_code)]
pub fn quarantined_store() -> PetStore {
    let conn = db::connect(&StoreConfig::in_memory()).unwrap();
    conn.execute_batch(
        r#"
        CREATE TRIGGER pet_quarantine_insert BEFORE INSERT ON pet
        WHEN NEW.breed = 'Quarantined'
        BEGIN SELECT RAISE(ABORT, 'breed is quarantined'); END;

        CREATE TRIGGER pet_quarantine_update BEFORE UPDATE ON pet
        WHEN NEW.breed = 'Quarantined'
        BEGIN SELECT RAISE(ABORT, 'breed is quarantined'); END;
        "#,
    )
    .unwrap();
    PetStore::from_connection(conn)
}
