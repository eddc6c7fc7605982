//! Plain-text rendering of classification results

use std::fmt;

use crate::types::ClassificationResult;

const BAR_WIDTH: usize = 20;

const DISCLAIMER: &str = "Hasil klasifikasi dihasilkan oleh AI dan mungkin tidak 100% akurat. \
Verifikasi dengan ahli untuk kepastian.";

/// IUCN status bucket derived from free-text conservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConservationLevel {
    LeastConcern,
    NearThreatened,
    Vulnerable,
    Endangered,
    CriticallyEndangered,
    Unknown,
}

impl ConservationLevel {
    pub fn from_status(status: &str) -> Self {
        let lower = status.to_lowercase();
        if lower.contains("least concern") {
            Self::LeastConcern
        } else if lower.contains("near threatened") {
            Self::NearThreatened
        } else if lower.contains("vulnerable") {
            Self::Vulnerable
        } else if lower.contains("critically") {
            Self::CriticallyEndangered
        } else if lower.contains("endangered") {
            Self::Endangered
        } else {
            Self::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LeastConcern => "risiko rendah",
            Self::NearThreatened => "hampir terancam",
            Self::Vulnerable => "rentan",
            Self::Endangered => "terancam",
            Self::CriticallyEndangered => "kritis",
            Self::Unknown => "tidak diketahui",
        }
    }
}

/// Confidence bucket used for the meter label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_confidence(value: f64) -> Self {
        if value >= 80.0 {
            Self::High
        } else if value >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "tinggi",
            Self::Medium => "sedang",
            Self::Low => "rendah",
        }
    }
}

/// Display adapter over a borrowed result
pub struct Report<'a>(pub &'a ClassificationResult);

/// Render a result as a text report
pub fn render(result: &ClassificationResult) -> String {
    Report(result).to_string()
}

/// Text meter for a 0-100 value; out-of-range values are shown clamped
pub fn confidence_bar(value: f64) -> String {
    let filled = ((value.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;

        if !r.is_animal {
            writeln!(f, "Bukan Gambar Hewan")?;
            return writeln!(
                f,
                "AI tidak dapat mendeteksi hewan pada gambar ini. Silakan upload gambar yang berisi hewan."
            );
        }

        write!(f, "{}", r.common_name.as_deref().unwrap_or("(tanpa nama)"))?;
        if let Some(category) = &r.category {
            write!(f, " [{}]", category)?;
        }
        writeln!(f)?;
        if let Some(name) = &r.scientific_name {
            writeln!(f, "{}", name)?;
        }
        if let Some(name) = &r.english_name {
            writeln!(f, "{}", name)?;
        }
        if let Some(description) = &r.description {
            writeln!(f, "\n{}", description)?;
        }

        writeln!(
            f,
            "\nTingkat Kepercayaan AI: {} {}% ({})",
            confidence_bar(r.confidence),
            r.confidence,
            ConfidenceTier::from_confidence(r.confidence).label()
        )?;
        if let Some(status) = &r.conservation_status {
            writeln!(
                f,
                "Status Konservasi: {} ({})",
                status,
                ConservationLevel::from_status(status).label()
            )?;
        }

        if r.habitat.is_some() || r.diet.is_some() {
            writeln!(f)?;
        }
        if let Some(habitat) = &r.habitat {
            writeln!(f, "Habitat: {}", habitat)?;
        }
        if let Some(diet) = &r.diet {
            writeln!(f, "Pola Makan: {}", diet)?;
        }

        writeln!(f, "\nTaksonomi")?;
        for (level, value) in r.classification.levels() {
            if let Some(value) = value {
                writeln!(f, "  {:<9} {}", capitalize(level), value)?;
            }
        }

        if !r.fun_facts.is_empty() {
            writeln!(f, "\nFakta Menarik")?;
            for (i, fact) in r.fun_facts.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, fact)?;
            }
        }

        writeln!(f, "\n{}", DISCLAIMER)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Taxonomy;

    fn tiger() -> ClassificationResult {
        ClassificationResult {
            is_animal: true,
            common_name: Some("Harimau Sumatra".to_string()),
            scientific_name: Some("Panthera tigris sondaica".to_string()),
            english_name: Some("Sumatran Tiger".to_string()),
            classification: Taxonomy {
                kingdom: Some("Animalia".to_string()),
                phylum: Some("Chordata".to_string()),
                class: Some("Mammalia".to_string()),
                order: Some("Carnivora".to_string()),
                family: Some("Felidae".to_string()),
                genus: Some("Panthera".to_string()),
                species: None,
            },
            category: Some("Mamalia".to_string()),
            habitat: Some("Hutan hujan tropis Sumatra".to_string()),
            diet: Some("Karnivora".to_string()),
            conservation_status: Some("Critically Endangered".to_string()),
            fun_facts: vec![
                "Harimau terkecil yang masih hidup.".to_string(),
                "Pandai berenang.".to_string(),
                "Belang setiap individu unik.".to_string(),
            ],
            confidence: 88.0,
            description: Some("Subspesies harimau endemik Sumatra.".to_string()),
        }
    }

    #[test]
    fn test_render_animal_sections() {
        let text = render(&tiger());

        assert!(text.starts_with("Harimau Sumatra [Mamalia]\n"));
        assert!(text.contains(&format!(
            "Tingkat Kepercayaan AI: [{}{}] 88% (tinggi)",
            "#".repeat(18),
            "-".repeat(2)
        )));
        assert!(text.contains("Status Konservasi: Critically Endangered (kritis)"));
        assert!(text.contains("  Class     Mammalia\n"));
        assert!(!text.contains("Species"));
        assert!(text.contains("  3. Belang setiap individu unik.\n"));
        assert!(text.contains("Pola Makan: Karnivora"));
        assert!(text.ends_with(&format!("{}\n", DISCLAIMER)));
    }

    #[test]
    fn test_render_not_animal() {
        let text = render(&ClassificationResult::not_animal());

        assert!(text.starts_with("Bukan Gambar Hewan\n"));
        assert!(!text.contains("Taksonomi"));
    }

    #[test]
    fn test_render_is_idempotent_and_leaves_input_untouched() {
        let result = tiger();
        let snapshot = result.clone();

        assert_eq!(render(&result), render(&result));
        assert_eq!(result, snapshot);
    }

    #[test]
    fn test_render_skips_empty_fun_facts() {
        let mut result = tiger();
        result.fun_facts.clear();
        assert!(!render(&result).contains("Fakta Menarik"));
    }

    #[test]
    fn test_conservation_levels() {
        assert_eq!(
            ConservationLevel::from_status("Least Concern (LC)"),
            ConservationLevel::LeastConcern
        );
        assert_eq!(
            ConservationLevel::from_status("near threatened"),
            ConservationLevel::NearThreatened
        );
        assert_eq!(
            ConservationLevel::from_status("Endangered"),
            ConservationLevel::Endangered
        );
        assert_eq!(
            ConservationLevel::from_status("Critically Endangered"),
            ConservationLevel::CriticallyEndangered
        );
        assert_eq!(
            ConservationLevel::from_status("Domestikasi"),
            ConservationLevel::Unknown
        );
    }

    #[test]
    fn test_confidence_tiers_and_bar() {
        assert_eq!(ConfidenceTier::from_confidence(80.0), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_confidence(60.0), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_confidence(59.9), ConfidenceTier::Low);

        assert_eq!(confidence_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(confidence_bar(150.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(confidence_bar(-3.0), confidence_bar(0.0));
    }
}
