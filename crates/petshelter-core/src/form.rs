//! Editor form parsing
//!
//! Raw text collected by an editor surface is turned into a [`NewPet`]
//! here: fields are trimmed and the weight text is parsed before anything
//! reaches the store. An empty name is a valid name.

use crate::errors::Result;
use crate::model::{Gender, NewPet, Pet};
use crate::rules::validation::parse_weight;

/// Raw editor field values, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetForm {
    pub name: String,
    pub breed: String,
    pub weight: String,
    pub gender: Gender,
}

impl PetForm {
    /// Populate the form from a stored pet
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            breed: pet.breed.clone().unwrap_or_default(),
            weight: pet.weight.to_string(),
            gender: pet.gender,
        }
    }

    /// True when nothing was entered: every text field is blank and the
    /// gender was left at unknown
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.breed.trim().is_empty()
            && self.weight.trim().is_empty()
            && self.gender == Gender::Unknown
    }

    /// Trim and parse the fields
    ///
    /// An empty breed becomes `None`; an empty weight becomes 0. The name is
    /// kept even when it trims to nothing.
    ///
    /// # Errors
    /// `InvalidWeight` for weight text that is not a non-negative whole
    /// number.
    pub fn to_new_pet(&self) -> Result<NewPet> {
        let name = self.name.trim();
        let breed = self.breed.trim();
        let weight = parse_weight(&self.weight)?;

        Ok(NewPet {
            name: name.to_string(),
            breed: (!breed.is_empty()).then(|| breed.to_string()),
            gender: self.gender,
            weight,
        })
    }
}
