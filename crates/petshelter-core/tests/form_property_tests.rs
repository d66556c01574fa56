use petshelter_core::{Gender, PetForm};
use proptest::prelude::*;

fn arb_gender() -> impl Strategy<Value = Gender> {
    prop_oneof![
        Just(Gender::Unknown),
        Just(Gender::Male),
        Just(Gender::Female)
    ]
}

proptest! {
    /// Whatever padding surrounds the fields, the parsed pet carries the
    /// trimmed values.
    #[test]
    fn prop_parsed_fields_are_trimmed(
        name in "[A-Za-z][A-Za-z ]{0,15}[A-Za-z]",
        breed in "[A-Za-z]{0,12}",
        weight in 0u32..10_000,
        pad in " {0,3}",
        gender in arb_gender(),
    ) {
        let form = PetForm {
            name: format!("{pad}{name}{pad}"),
            breed: format!("{pad}{breed}{pad}"),
            weight: format!("{pad}{weight}{pad}"),
            gender,
        };

        let pet = form.to_new_pet().unwrap();
        prop_assert_eq!(pet.name, name);
        prop_assert_eq!(pet.breed, (!breed.is_empty()).then(|| breed.clone()));
        prop_assert_eq!(pet.weight, weight);
        prop_assert_eq!(pet.gender, gender);
    }

    /// Negative weights never parse.
    #[test]
    fn prop_negative_weight_rejected(weight in 1i64..1_000_000) {
        let form = PetForm {
            name: "Toto".to_string(),
            weight: format!("-{weight}"),
            ..PetForm::default()
        };
        prop_assert!(form.to_new_pet().is_err());
    }

    /// Gender codes survive the storage mapping.
    #[test]
    fn prop_gender_code_round_trip(gender in arb_gender()) {
        prop_assert_eq!(Gender::from_code(gender.code()), Some(gender));
    }
}
