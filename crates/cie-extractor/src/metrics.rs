//! Quality Metrics module
//!
//! Evaluates an extracted instance list against a gold-standard list of
//! entity strings, reporting precision, recall, and F1.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use cie_core::ExtractedInstance;

/// Metrics for instance extraction evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceMetrics {
    /// True positives (correctly extracted instances)
    pub true_positives: usize,
    /// False positives (extracted but not in the gold list)
    pub false_positives: usize,
    /// False negatives (missed gold instances)
    pub false_negatives: usize,
    /// Total instances in gold standard
    pub gold_total: usize,
    /// Total instances predicted
    pub predicted_total: usize,
}

impl InstanceMetrics {
    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f32 {
        if self.true_positives + self.false_positives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_positives) as f32
        }
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f32 {
        if self.true_positives + self.false_negatives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_negatives) as f32
        }
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Render a summary report
    pub fn report(&self) -> String {
        format!(
            "=== Extraction Quality Report ===\n\n\
             Precision: {:.1}%\n\
             Recall:    {:.1}%\n\
             F1 Score:  {:.1}%\n\
             Gold: {} | Predicted: {} | TP: {} | FP: {} | FN: {}\n",
            self.precision() * 100.0,
            self.recall() * 100.0,
            self.f1_score() * 100.0,
            self.gold_total,
            self.predicted_total,
            self.true_positives,
            self.false_positives,
            self.false_negatives,
        )
    }
}

/// Evaluator for extraction quality
pub struct Evaluator {
    /// Fold case before matching instance strings
    case_insensitive: bool,
}

impl Evaluator {
    /// Create a new evaluator with case-insensitive matching
    pub fn new() -> Self {
        Self {
            case_insensitive: true,
        }
    }

    /// Enable/disable case folding
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    fn normalize(&self, s: &str) -> String {
        if self.case_insensitive {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    }

    /// Evaluate predicted instances against the gold list
    pub fn evaluate(&self, predicted: &[ExtractedInstance], gold: &[String]) -> InstanceMetrics {
        let predicted_set: HashSet<String> =
            predicted.iter().map(|i| self.normalize(&i.text)).collect();
        let gold_set: HashSet<String> = gold.iter().map(|g| self.normalize(g)).collect();

        let true_positives = predicted_set.intersection(&gold_set).count();
        let false_positives = predicted_set.len() - true_positives;
        let false_negatives = gold_set.len() - true_positives;

        InstanceMetrics {
            true_positives,
            false_positives,
            false_negatives,
            gold_total: gold_set.len(),
            predicted_total: predicted_set.len(),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(text: &str) -> ExtractedInstance {
        ExtractedInstance::new(text, 0.9)
    }

    #[test]
    fn test_metrics_precision_recall() {
        let metrics = InstanceMetrics {
            true_positives: 8,
            false_positives: 2,
            false_negatives: 2,
            gold_total: 10,
            predicted_total: 10,
        };

        assert!((metrics.precision() - 0.8).abs() < 0.001);
        assert!((metrics.recall() - 0.8).abs() < 0.001);
        assert!((metrics.f1_score() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_metrics_empty() {
        let metrics = InstanceMetrics::default();
        assert_eq!(metrics.precision(), 0.0);
        assert_eq!(metrics.recall(), 0.0);
        assert_eq!(metrics.f1_score(), 0.0);
    }

    #[test]
    fn test_evaluate_perfect() {
        let evaluator = Evaluator::new();
        let predicted = vec![instance("Narthul"), instance("Ignis")];
        let gold = vec!["narthul".to_string(), "ignis".to_string()];

        let metrics = evaluator.evaluate(&predicted, &gold);
        assert_eq!(metrics.true_positives, 2);
        assert_eq!(metrics.false_positives, 0);
        assert_eq!(metrics.false_negatives, 0);
    }

    #[test]
    fn test_evaluate_partial() {
        let evaluator = Evaluator::new();
        let predicted = vec![instance("Narthul"), instance("obsidian scales")];
        let gold = vec!["Narthul".to_string(), "Ignis".to_string()];

        let metrics = evaluator.evaluate(&predicted, &gold);
        assert_eq!(metrics.true_positives, 1);
        assert_eq!(metrics.false_positives, 1);
        assert_eq!(metrics.false_negatives, 1);
        assert!((metrics.precision() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_evaluate_case_sensitive() {
        let evaluator = Evaluator::new().with_case_insensitive(false);
        let predicted = vec![instance("narthul")];
        let gold = vec!["Narthul".to_string()];

        let metrics = evaluator.evaluate(&predicted, &gold);
        assert_eq!(metrics.true_positives, 0);
    }

    #[test]
    fn test_report_contents() {
        let metrics = InstanceMetrics {
            true_positives: 4,
            false_positives: 1,
            false_negatives: 1,
            gold_total: 5,
            predicted_total: 5,
        };

        let report = metrics.report();
        assert!(report.contains("Precision: 80.0%"));
        assert!(report.contains("Recall:    80.0%"));
    }
}
