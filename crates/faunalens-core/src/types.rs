//! Core types for FaunaLens

use serde::{Deserialize, Serialize};

/// Seven-level biological classification, each level independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
}

impl Taxonomy {
    /// Level keys in rank order, as they appear on the wire
    pub const LEVELS: [&'static str; 7] = [
        "kingdom", "phylum", "class", "order", "family", "genus", "species",
    ];

    /// Levels paired with their values, in rank order
    pub fn levels(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("kingdom", self.kingdom.as_deref()),
            ("phylum", self.phylum.as_deref()),
            ("class", self.class.as_deref()),
            ("order", self.order.as_deref()),
            ("family", self.family.as_deref()),
            ("genus", self.genus.as_deref()),
            ("species", self.species.as_deref()),
        ]
    }

    /// True when no level is known
    pub fn is_empty(&self) -> bool {
        self.levels().iter().all(|(_, value)| value.is_none())
    }
}

/// Structured classification of the animal depicted in one image.
///
/// Produced once per request and handed to the caller unchanged. When
/// `is_animal` is false every other field is null or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub is_animal: bool,
    /// Common name in Indonesian
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub english_name: Option<String>,
    pub classification: Taxonomy,
    /// Free-text category such as "Mamalia" or "Reptil"
    pub category: Option<String>,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    /// IUCN status text, e.g. "Least Concern"
    pub conservation_status: Option<String>,
    pub fun_facts: Vec<String>,
    /// Intended range 0-100, not clamped
    pub confidence: f64,
    pub description: Option<String>,
}

impl ClassificationResult {
    /// Result for an image with no animal in it
    pub fn not_animal() -> Self {
        Self {
            is_animal: false,
            common_name: None,
            scientific_name: None,
            english_name: None,
            classification: Taxonomy::default(),
            category: None,
            habitat: None,
            diet: None,
            conservation_status: None,
            fun_facts: Vec::new(),
            confidence: 0.0,
            description: None,
        }
    }

    /// Enforce the non-animal contract: drop everything the model filled in
    /// alongside `isAnimal=false`.
    pub fn normalized(self) -> Self {
        if self.is_animal {
            self
        } else {
            Self::not_animal()
        }
    }

    /// Whether every non-flag field is null or empty
    pub fn is_blank(&self) -> bool {
        self.common_name.is_none()
            && self.scientific_name.is_none()
            && self.english_name.is_none()
            && self.classification.is_empty()
            && self.category.is_none()
            && self.habitat.is_none()
            && self.diet.is_none()
            && self.conservation_status.is_none()
            && self.fun_facts.is_empty()
            && self.description.is_none()
    }
}
