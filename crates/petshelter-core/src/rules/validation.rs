use crate::errors::{PetShelterError, Result};

/// Parse weight text from an input field
///
/// Surrounding whitespace is ignored and an empty field means 0.
///
/// # Errors
/// `InvalidWeight` for anything that is not a non-negative whole number
/// that fits in a `u32`.
pub fn parse_weight(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| PetShelterError::InvalidWeight {
            value: text.to_string(),
        })
}
