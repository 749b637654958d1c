//! CIE Extractor - Concept instance extraction pipeline
//!
//! Turns raw extractive-QA answers into a ranked, deduplicated list of clean
//! entity strings for an abstract concept:
//! - Query synthesis: four deterministic question phrasings per concept
//! - Consolidation: score normalization and containment-overlap dedup
//! - Validity gating: heuristic filtering against a function-word stoplist
//! - Orchestration: per-query reader calls, proper-noun re-ranking, final
//!   case-insensitive dedup

pub mod consolidate;
pub mod gate;
pub mod metrics;
pub mod pipeline;
pub mod query;

pub use consolidate::{consolidate, Candidate};
pub use gate::{clean_span, ValidityGate};
pub use metrics::{Evaluator, InstanceMetrics};
pub use pipeline::InstanceExtractor;
pub use query::QuerySynthesizer;
