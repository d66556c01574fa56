use serde::{Deserialize, Serialize};

use super::gender::Gender;

/// Text shown in place of an absent or empty breed
pub const UNKNOWN_BREED_LABEL: &str = "Unknown breed";

/// Row identifier assigned by the store on insert
///
/// Ids are never reused within a store's lifetime, even after the row is
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(i64);

impl PetId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PetId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A pet that has not been persisted yet
///
/// Carries every column except the id. `insert` is the only way to turn a
/// `NewPet` into a [`Pet`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPet {
    /// Required; stored exactly as given
    pub name: String,

    /// Optional; `None` and `Some("")` both display as unknown
    pub breed: Option<String>,

    pub gender: Gender,

    /// Weight in whole kilograms
    pub weight: u32,
}

impl NewPet {
    /// Create a pet with the given name and default breed/gender/weight
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Attach the id the store assigned
    pub fn into_pet(self, id: PetId) -> Pet {
        Pet {
            id,
            name: self.name,
            breed: self.breed,
            gender: self.gender,
            weight: self.weight,
        }
    }
}

/// A persisted pet record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: u32,
}

impl Pet {
    /// Breed as the catalog renders it
    pub fn breed_display(&self) -> &str {
        match self.breed.as_deref() {
            Some(breed) if !breed.is_empty() => breed,
            _ => UNKNOWN_BREED_LABEL,
        }
    }

    /// Drop the id, keeping the column values
    pub fn to_new(&self) -> NewPet {
        NewPet {
            name: self.name.clone(),
            breed: self.breed.clone(),
            gender: self.gender,
            weight: self.weight,
        }
    }
}
