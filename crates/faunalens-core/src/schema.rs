//! Classification schema and structural validation
//!
//! [`validate`] checks raw model output against the shape of
//! [`ClassificationResult`]: every declared field must be present, nullable
//! fields may be `null`, and a value of the wrong JSON type is rejected rather
//! than defaulted. Unknown fields are ignored. No range or length rules are
//! applied (confidence is not clamped, fun facts are not counted).
//!
//! [`response_schema`] describes the same shape in the structured-output
//! dialect understood by the inference provider.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::types::{ClassificationResult, Taxonomy};

/// Structural mismatch between model output and the classification schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Output text was not JSON at all
    #[error("output is not valid JSON: {0}")]
    Malformed(String),

    /// Top-level value was not an object
    #[error("output is not a JSON object")]
    NotAnObject,

    /// A declared field is absent
    #[error("missing field `{path}`")]
    MissingField { path: String },

    /// A field holds a value of the wrong JSON type
    #[error("field `{path}` expected {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ValidationError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    fn wrong_type(path: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self::WrongType {
            path: path.into(),
            expected,
            found: type_name(found),
        }
    }
}

/// Validate raw model output and build a [`ClassificationResult`].
///
/// A result reporting `isAnimal=false` is normalized so that every other
/// field is null or empty.
pub fn validate(raw: &Value) -> Result<ClassificationResult, ValidationError> {
    let root = Object::root(raw)?;
    let taxonomy = root.object("classification")?;

    let result = ClassificationResult {
        is_animal: root.boolean("isAnimal")?,
        common_name: root.nullable_string("commonName")?,
        scientific_name: root.nullable_string("scientificName")?,
        english_name: root.nullable_string("englishName")?,
        classification: Taxonomy {
            kingdom: taxonomy.nullable_string("kingdom")?,
            phylum: taxonomy.nullable_string("phylum")?,
            class: taxonomy.nullable_string("class")?,
            order: taxonomy.nullable_string("order")?,
            family: taxonomy.nullable_string("family")?,
            genus: taxonomy.nullable_string("genus")?,
            species: taxonomy.nullable_string("species")?,
        },
        category: root.nullable_string("category")?,
        habitat: root.nullable_string("habitat")?,
        diet: root.nullable_string("diet")?,
        conservation_status: root.nullable_string("conservationStatus")?,
        fun_facts: root.string_array("funFacts")?,
        confidence: root.number("confidence")?,
        description: root.nullable_string("description")?,
    };

    if !result.is_animal && !result.is_blank() {
        debug!("Clearing fields reported alongside isAnimal=false");
    }

    Ok(result.normalized())
}

/// Parse model output text as JSON, then [`validate`] it
pub fn validate_str(text: &str) -> Result<ClassificationResult, ValidationError> {
    let raw: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    validate(&raw)
}

/// Structured-output schema sent to the inference provider
pub fn response_schema() -> Value {
    let taxonomy: Map<String, Value> = Taxonomy::LEVELS
        .iter()
        .map(|level| (level.to_string(), json!({ "type": "STRING", "nullable": true })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "isAnimal": {
                "type": "BOOLEAN",
                "description": "Whether the image contains an animal"
            },
            "commonName": nullable_string("Common name of the animal in Indonesian"),
            "scientificName": nullable_string("Scientific/Latin name of the animal"),
            "englishName": nullable_string("Common English name of the animal"),
            "classification": {
                "type": "OBJECT",
                "properties": taxonomy,
                "required": Taxonomy::LEVELS
            },
            "category": nullable_string(
                "General category: Mamalia, Reptil, Burung, Ikan, Amfibi, Serangga, Arakhnida, Moluska, dll."
            ),
            "habitat": nullable_string("Natural habitat description in Indonesian"),
            "diet": nullable_string("Diet type: Karnivora, Herbivora, Omnivora, Insektivora, dll."),
            "conservationStatus": nullable_string(
                "IUCN conservation status: Least Concern, Vulnerable, Endangered, Critically Endangered, dll."
            ),
            "funFacts": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 interesting facts about the animal in Indonesian"
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Confidence level of classification from 0 to 100"
            },
            "description": nullable_string(
                "Brief description of the animal in Indonesian (2-3 sentences)"
            )
        },
        "required": REQUIRED_FIELDS
    })
}

/// Top-level fields every valid result carries
pub const REQUIRED_FIELDS: [&str; 12] = [
    "isAnimal",
    "commonName",
    "scientificName",
    "englishName",
    "classification",
    "category",
    "habitat",
    "diet",
    "conservationStatus",
    "funFacts",
    "confidence",
    "description",
];

fn nullable_string(description: &str) -> Value {
    json!({ "type": "STRING", "nullable": true, "description": description })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JSON object view that tracks its path for error messages
struct Object<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Object<'a> {
    fn root(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                prefix: String::new(),
            }),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    fn path(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn field(&self, key: &str) -> Result<&'a Value, ValidationError> {
        self.map
            .get(key)
            .ok_or_else(|| ValidationError::missing(self.path(key)))
    }

    fn object(&self, key: &str) -> Result<Object<'a>, ValidationError> {
        match self.field(key)? {
            Value::Object(map) => Ok(Object {
                map,
                prefix: format!("{}.", self.path(key)),
            }),
            other => Err(ValidationError::wrong_type(self.path(key), "object", other)),
        }
    }

    fn boolean(&self, key: &str) -> Result<bool, ValidationError> {
        match self.field(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(ValidationError::wrong_type(self.path(key), "boolean", other)),
        }
    }

    fn number(&self, key: &str) -> Result<f64, ValidationError> {
        let value = self.field(key)?;
        value
            .as_f64()
            .ok_or_else(|| ValidationError::wrong_type(self.path(key), "number", value))
    }

    fn nullable_string(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.field(key)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(ValidationError::wrong_type(
                self.path(key),
                "string or null",
                other,
            )),
        }
    }

    fn string_array(&self, key: &str) -> Result<Vec<String>, ValidationError> {
        let items = match self.field(key)? {
            Value::Array(items) => items,
            other => return Err(ValidationError::wrong_type(self.path(key), "array", other)),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ValidationError::wrong_type(
                    format!("{}[{}]", self.path(key), i),
                    "string",
                    other,
                )),
            })
            .collect()
    }
}
