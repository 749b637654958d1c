//! Query Synthesis module
//!
//! Generates a set of varied, natural-language questions per abstract
//! concept to probe the reader from different phrasings. The question set is
//! deterministic: identical input always yields identical queries in the
//! same order.

/// Deterministic question generator for an abstract concept
#[derive(Debug, Clone, Copy, Default)]
pub struct QuerySynthesizer;

impl QuerySynthesizer {
    /// Create a new synthesizer
    pub fn new() -> Self {
        Self
    }

    /// Generate the four question variants for a concept.
    ///
    /// Returns an empty vector for an empty concept.
    pub fn generate(&self, concept: &str) -> Vec<String> {
        if concept.is_empty() {
            return Vec::new();
        }

        let plural = pluralize(concept);

        vec![
            format!("What are the instances of {concept} mentioned in the text?"),
            format!("Which {plural} are described in the passage?"),
            format!("What specific {plural} are listed in the document?"),
            format!("Identify the names of the {plural} in the text."),
        ]
    }
}

/// Pluralize an English concept phrase.
///
/// Rules, in order:
/// 1. Trailing "y" preceded by a non-vowel, length > 1: "y" -> "ies"
/// 2. Trailing "s", "x", "z", "ch", "sh": append "es"
/// 3. Otherwise: append "s"
pub fn pluralize(concept: &str) -> String {
    let chars: Vec<char> = concept.chars().collect();

    if let [.., second_last, 'y'] = chars[..] {
        if !"aeiou".contains(second_last) {
            let stem: String = chars[..chars.len() - 1].iter().collect();
            return format!("{stem}ies");
        }
    }

    if concept.ends_with(['s', 'x', 'z']) || concept.ends_with("ch") || concept.ends_with("sh") {
        format!("{concept}es")
    } else {
        format!("{concept}s")
    }
}
