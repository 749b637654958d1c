//! Validity Gate module
//!
//! The final heuristic filter that turns a ranked candidate span into a
//! clean entity string or rejects it. A span is rejected when it is too
//! long, merely restates the abstract concept, or consists entirely of
//! function/filler words.

use std::collections::HashSet;

use cie_core::ExtractorConfig;

/// Closed set of function/filler words: articles, prepositions, auxiliary
/// verbs, number words, possessives, ordinal/comparative adjectives, and a
/// short list of generic color/size words.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "in", "on", "of", "for", "to", "with", "by", "at", "is", "are", "was",
    "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will", "would",
    "should", "can", "could", "may", "might", "must", "one", "two", "three", "four", "five",
    "six", "seven", "eight", "nine", "ten", "some", "any", "all", "several", "many", "few",
    "other", "another", "various", "its", "their", "my", "your", "his", "her", "first",
    "second", "third", "last", "next", "former", "latter", "largest", "smallest", "older",
    "newer", "red", "green", "blue", "performance-critical", "sections",
];

/// Strip leading and trailing punctuation and whitespace from a span
pub fn clean_span(span: &str) -> &str {
    span.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
}

/// Heuristic validity filter for cleaned candidate spans.
///
/// The stoplist is an immutable value fixed at construction; nothing mutates
/// it at runtime. Policy knobs (maximum span words, minimum words outside
/// the stoplist) are configurable rather than hard-coded.
#[derive(Debug, Clone)]
pub struct ValidityGate {
    stopwords: HashSet<String>,
    max_span_words: usize,
    min_content_words: usize,
}

impl ValidityGate {
    /// Create a gate with the built-in stoplist and default policy
    pub fn new() -> Self {
        Self {
            stopwords: FUNCTION_WORDS.iter().map(|w| w.to_string()).collect(),
            max_span_words: 3,
            min_content_words: 1,
        }
    }

    /// Create from config, merging any extra stopwords into the built-in set
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let mut gate = Self::new();
        gate.max_span_words = config.max_span_words;
        gate.min_content_words = config.min_content_words;
        gate.stopwords
            .extend(config.extra_stopwords.iter().map(|w| w.to_lowercase()));
        gate
    }

    /// Set the maximum whitespace-separated word count
    pub fn with_max_span_words(mut self, max: usize) -> Self {
        self.max_span_words = max;
        self
    }

    /// Set the minimum number of non-stoplist words
    pub fn with_min_content_words(mut self, min: usize) -> Self {
        self.min_content_words = min;
        self
    }

    /// Decide whether a cleaned span is a valid concrete instance of the
    /// abstract concept.
    pub fn is_valid(&self, span: &str, concept: &str) -> bool {
        let span_lower = span.to_lowercase();
        let words: Vec<&str> = span_lower.split_whitespace().collect();

        if words.len() > self.max_span_words {
            return false;
        }

        // A span whose words already cover the whole concept is a
        // restatement, not a concrete instance
        let word_set: HashSet<&str> = words.iter().copied().collect();
        let concept_lower = concept.to_lowercase();
        let concept_words: HashSet<&str> = concept_lower.split_whitespace().collect();
        if concept_words.is_subset(&word_set) {
            return false;
        }

        let content_words = words
            .iter()
            .filter(|w| !self.stopwords.contains(**w))
            .count();

        content_words >= self.min_content_words
    }
}

impl Default for ValidityGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_span_strips_punctuation_and_whitespace() {
        assert_eq!(clean_span("  'Odyssey', "), "Odyssey");
        assert_eq!(clean_span("(Narthul)"), "Narthul");
        assert_eq!(clean_span("Ignis"), "Ignis");
        assert_eq!(clean_span("Alpha-7"), "Alpha-7");
    }

    #[test]
    fn test_gate_accepts_proper_names() {
        let gate = ValidityGate::new();
        assert!(gate.is_valid("Narthul", "dragon"));
        assert!(gate.is_valid("Vitae Essence", "potion"));
    }

    #[test]
    fn test_gate_rejects_long_spans() {
        let gate = ValidityGate::new();
        assert!(!gate.is_valid("a smaller but faster one", "dragon"));
    }

    #[test]
    fn test_gate_rejects_concept_restatement() {
        let gate = ValidityGate::new();
        assert!(!gate.is_valid("the dragon", "dragon"));
        assert!(!gate.is_valid("dragon", "dragon"));
        assert!(!gate.is_valid("Magic Spell", "magic spell"));
    }

    #[test]
    fn test_gate_rejects_pure_function_words() {
        let gate = ValidityGate::new();
        assert!(!gate.is_valid("in the", "dragon"));
        assert!(!gate.is_valid("the first", "dragon"));
        assert!(!gate.is_valid("", "dragon"));
    }

    #[test]
    fn test_gate_restatement_is_case_insensitive() {
        let gate = ValidityGate::new();
        assert!(!gate.is_valid("The Dragon", "dragon"));
    }

    #[test]
    fn test_gate_policy_is_configurable() {
        let strict = ValidityGate::new().with_min_content_words(2);
        // "Vitae Essence" has two content words, "Narthul" only one
        assert!(strict.is_valid("Vitae Essence", "potion"));
        assert!(!strict.is_valid("the Narthul", "dragon"));

        let wide = ValidityGate::new().with_max_span_words(5);
        assert!(wide.is_valid("a smaller but faster Ignis", "dragon"));
    }

    #[test]
    fn test_gate_from_config_extra_stopwords() {
        let config = ExtractorConfig {
            extra_stopwords: vec!["person".to_string()],
            ..Default::default()
        };
        let gate = ValidityGate::from_config(&config);
        assert!(!gate.is_valid("person", "character"));
        assert!(gate.is_valid("Lirael", "character"));
    }
}
