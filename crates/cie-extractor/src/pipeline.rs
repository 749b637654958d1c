//! Extraction Orchestrator module
//!
//! Drives the full pipeline: query synthesis, one reader call per query,
//! answer pooling, consolidation, proper-noun re-ranking, span cleaning,
//! validity gating, and final case-insensitive deduplication.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use cie_core::{AnswerReader, ExtractedInstance, ExtractorConfig, RawAnswer, Result};

use crate::consolidate::consolidate;
use crate::gate::{clean_span, ValidityGate};
use crate::query::QuerySynthesizer;

/// Outcome of running one synthesized query against the reader.
///
/// A failed query is merged as an explicit empty contribution rather than
/// aborting the batch.
#[derive(Debug)]
struct QueryRun {
    query: String,
    outcome: Result<Vec<RawAnswer>>,
}

/// Orchestrates the concept instance extraction pipeline.
///
/// The reader is shared read-only; the extractor holds no per-call state,
/// so one instance can serve many `extract` calls. Queries are issued
/// strictly sequentially within a call, and no retries or timeouts are
/// applied here; callers impose deadlines externally.
pub struct InstanceExtractor {
    reader: Arc<dyn AnswerReader>,
    synthesizer: QuerySynthesizer,
    gate: ValidityGate,
}

impl InstanceExtractor {
    /// Create an extractor with the default gate policy
    pub fn new(reader: Arc<dyn AnswerReader>) -> Self {
        Self {
            reader,
            synthesizer: QuerySynthesizer::new(),
            gate: ValidityGate::new(),
        }
    }

    /// Create an extractor from config
    pub fn from_config(reader: Arc<dyn AnswerReader>, config: &ExtractorConfig) -> Self {
        Self {
            reader,
            synthesizer: QuerySynthesizer::new(),
            gate: ValidityGate::from_config(config),
        }
    }

    /// Replace the validity gate
    pub fn with_gate(mut self, gate: ValidityGate) -> Self {
        self.gate = gate;
        self
    }

    /// Extract concrete instances of `concept` from `context`.
    ///
    /// Returns an empty list (not an error) when either input is empty or
    /// when nothing survives the pipeline. A reader failure on an individual
    /// query is logged and that query's contribution skipped.
    pub async fn extract(&self, context: &str, concept: &str) -> Result<Vec<ExtractedInstance>> {
        if context.is_empty() || concept.is_empty() {
            return Ok(Vec::new());
        }

        let queries = self.synthesizer.generate(concept);
        tracing::info!(
            concept,
            reader = self.reader.name(),
            queries = queries.len(),
            "extraction started"
        );

        // One reader call per query, strictly sequential
        let mut runs = Vec::with_capacity(queries.len());
        for query in queries {
            let outcome = self.reader.read(&query, context).await;
            runs.push(QueryRun { query, outcome });
        }

        let mut pooled: Vec<RawAnswer> = Vec::new();
        for run in runs {
            match run.outcome {
                Ok(answers) => {
                    tracing::debug!(query = %run.query, answers = answers.len(), "query answered");
                    pooled.extend(answers);
                }
                Err(e) => {
                    tracing::warn!(query = %run.query, error = %e, "reader failed, skipping query");
                }
            }
        }
        tracing::debug!(pooled = pooled.len(), "answers pooled");

        let mut candidates = consolidate(pooled);
        tracing::debug!(candidates = candidates.len(), "answers consolidated");

        for candidate in &mut candidates {
            candidate.is_proper = candidate
                .text
                .chars()
                .next()
                .map(char::is_uppercase)
                .unwrap_or(false);
        }

        // Different key than consolidation: capitalized spans are strong
        // instance signals, so they outrank higher-normalized lowercase ones
        candidates.sort_by(|a, b| {
            b.is_proper
                .cmp(&a.is_proper)
                .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        });

        let mut seen: HashSet<String> = HashSet::new();
        let mut results = Vec::new();

        for candidate in &candidates {
            let clean = clean_span(&candidate.text);

            if self.gate.is_valid(clean, concept) && seen.insert(clean.to_lowercase()) {
                results.push(ExtractedInstance::new(clean, round4(candidate.score)));
            }
        }

        tracing::info!(concept, instances = results.len(), "extraction finished");
        Ok(results)
    }
}

/// Round a score to 4 decimal places
fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}
