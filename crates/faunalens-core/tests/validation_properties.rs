//! Property tests for the classification validator

use faunalens_core::schema::REQUIRED_FIELDS;
use faunalens_core::{validate, Taxonomy, ValidationError};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn nullable_text() -> impl Strategy<Value = Value> {
    prop_oneof![Just(Value::Null), "[a-zA-Z ]{0,24}".prop_map(Value::String)]
}

fn raw_result(is_animal: bool) -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(nullable_text(), 10),
        prop::collection::vec(nullable_text(), 7),
        prop::collection::vec("[a-z ]{0,40}", 0..6),
        -500.0f64..500.0,
    )
        .prop_map(move |(texts, levels, facts, confidence)| {
            let classification: Map<String, Value> = Taxonomy::LEVELS
                .iter()
                .zip(levels)
                .map(|(level, value)| (level.to_string(), value))
                .collect();

            json!({
                "isAnimal": is_animal,
                "commonName": texts[0],
                "scientificName": texts[1],
                "englishName": texts[2],
                "classification": classification,
                "category": texts[3],
                "habitat": texts[4],
                "diet": texts[5],
                "conservationStatus": texts[6],
                "funFacts": facts,
                "confidence": confidence,
                "description": texts[7],
                "extra": texts[8],
            })
        })
}

proptest! {
    #[test]
    fn non_animal_results_are_always_blank(raw in raw_result(false)) {
        let result = validate(&raw).unwrap();
        prop_assert!(!result.is_animal);
        prop_assert!(result.is_blank());
    }

    #[test]
    fn serialized_results_carry_every_field(raw in prop_oneof![raw_result(true), raw_result(false)]) {
        let result = validate(&raw).unwrap();
        let value = serde_json::to_value(&result).unwrap();

        for field in REQUIRED_FIELDS {
            prop_assert!(value.get(field).is_some(), "missing {}", field);
        }
        for level in Taxonomy::LEVELS {
            prop_assert!(value["classification"].get(level).is_some(), "missing {}", level);
        }
        prop_assert!(value.get("extra").is_none());
    }

    #[test]
    fn animal_confidence_is_passed_through(raw in raw_result(true)) {
        let result = validate(&raw).unwrap();
        prop_assert_eq!(Some(result.confidence), raw["confidence"].as_f64());
    }

    #[test]
    fn dropping_any_field_is_rejected(raw in raw_result(true), index in 0..REQUIRED_FIELDS.len()) {
        let mut raw = raw;
        let field = REQUIRED_FIELDS[index];
        raw.as_object_mut().unwrap().remove(field);

        prop_assert_eq!(validate(&raw), Err(ValidationError::missing(field)));
    }
}
