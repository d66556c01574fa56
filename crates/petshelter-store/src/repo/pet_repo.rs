//! SQLite repository for the `pet` table
//!
//! Plain statement helpers; locking, transactions and notification are the
//! caller's job (see [`crate::PetStore`]). A `&Transaction` can be passed
//! wherever a `&Connection` is expected.

use crate::errors::{corrupt_row, from_rusqlite, Result};
use petshelter_core::model::{Gender, NewPet, Pet, PetId};
use rusqlite::{Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "SELECT id, name, breed, gender, weight FROM pet";

/// SQLite repository for pets
pub struct SqlitePetRepo;

impl SqlitePetRepo {
    /// Insert a pet and return the id SQLite assigned
    pub fn insert_pet(conn: &Connection, pet: &NewPet) -> Result<PetId> {
        conn.execute(
            "INSERT INTO pet (name, breed, gender, weight) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![pet.name, pet.breed, pet.gender.code(), pet.weight],
        )
        .map_err(from_rusqlite)?;

        Ok(PetId::new(conn.last_insert_rowid()))
    }

    /// Overwrite every column of the row with `pet.id`
    ///
    /// Returns the number of rows changed (0 or 1).
    pub fn update_pet(conn: &Connection, pet: &Pet) -> Result<usize> {
        conn.execute(
            "UPDATE pet SET name = ?1, breed = ?2, gender = ?3, weight = ?4 WHERE id = ?5",
            rusqlite::params![
                pet.name,
                pet.breed,
                pet.gender.code(),
                pet.weight,
                pet.id.get()
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Delete the row with `id`; returns 0 or 1
    pub fn delete_pet(conn: &Connection, id: PetId) -> Result<usize> {
        conn.execute("DELETE FROM pet WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)
    }

    /// Delete every row; returns how many were removed
    pub fn delete_all_pets(conn: &Connection) -> Result<usize> {
        conn.execute("DELETE FROM pet", []).map_err(from_rusqlite)
    }

    /// Get a pet by id
    pub fn get_pet(conn: &Connection, id: PetId) -> Result<Option<Pet>> {
        let mut stmt = conn
            .prepare_cached(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .map_err(from_rusqlite)?;

        let raw = stmt
            .query_row([id.get()], RawPet::from_row)
            .optional()
            .map_err(from_rusqlite)?;

        raw.map(RawPet::into_pet).transpose()
    }

    /// List every pet in id order
    pub fn list_pets(conn: &Connection) -> Result<Vec<Pet>> {
        let mut stmt = conn
            .prepare_cached(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([], RawPet::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter().map(RawPet::into_pet).collect()
    }

    /// Number of rows in the table
    pub fn count_pets(conn: &Connection) -> Result<usize> {
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM pet", [], |row| row.get(0))
            .map_err(from_rusqlite)?;
        usize::try_from(count).map_err(|_| corrupt_row("count", count))
    }
}

/// Row as stored, before the integer columns are checked
struct RawPet {
    id: i64,
    name: String,
    breed: Option<String>,
    gender: i64,
    weight: i64,
}

impl RawPet {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            breed: row.get(2)?,
            gender: row.get(3)?,
            weight: row.get(4)?,
        })
    }

    fn into_pet(self) -> Result<Pet> {
        let gender =
            Gender::from_code(self.gender).ok_or_else(|| corrupt_row("gender", self.gender))?;
        let weight =
            u32::try_from(self.weight).map_err(|_| corrupt_row("weight", self.weight))?;

        Ok(Pet {
            id: PetId::new(self.id),
            name: self.name,
            breed: self.breed,
            gender,
            weight,
        })
    }
}
