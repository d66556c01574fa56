use serde::{Deserialize, Serialize};

use crate::errors::PetShelterError;

/// Gender of a pet, stored as a small integer code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Unknown, Gender::Male, Gender::Female];

    /// Stable storage code (0, 1, 2)
    pub fn code(self) -> i64 {
        match self {
            Gender::Unknown => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }

    /// Inverse of [`Gender::code`]; `None` for any other integer
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Gender::Unknown),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }

    /// Label shown by the editor's gender picker
    pub fn label(self) -> &'static str {
        match self {
            Gender::Unknown => "Unknown",
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Gender {
    type Err = PetShelterError;

    /// Accepts picker labels and codes, case-insensitively.
    /// An empty selection means unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unknown" | "0" => Ok(Gender::Unknown),
            "male" | "m" | "1" => Ok(Gender::Male),
            "female" | "f" | "2" => Ok(Gender::Female),
            _ => Err(PetShelterError::InvalidGender {
                value: s.to_string(),
            }),
        }
    }
}
