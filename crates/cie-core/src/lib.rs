//! CIE Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the CIE system:
//! - Answer span models (byte spans, raw reader answers, extracted instances)
//! - The `AnswerReader` trait for extractive QA backends
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, ExtractorConfig, LoggingConfig, ReaderConfig, ReaderProvider};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for CIE operations
#[derive(Error, Debug)]
pub enum CieError {
    #[error("Reader error: {0}")]
    Reader(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CieError>;

// ============================================================================
// Span Models
// ============================================================================

/// A contiguous character interval inside the source document.
///
/// Offsets are inclusive of `start` and exclusive of `end`, exactly as the
/// reader reports them. Used only for overlap comparison, never for slicing
/// the document text (the reader already returns the substring).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether this span fully encloses `other`, inclusive on both ends
    pub fn encloses(&self, other: &ByteSpan) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// A single candidate answer as returned by an [`AnswerReader`].
///
/// `text: None` denotes the reader's "no answer" response. Offsets are
/// optional: a reader that cannot locate an answer in the document returns
/// `span: None`, and such answers are never merged with one another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnswer {
    /// The extracted span text, absent for a no-answer response
    pub text: Option<String>,

    /// Reader-reported confidence; semantics are reader-internal but
    /// monotonic (higher = more confident)
    pub score: f32,

    /// Character offsets of the span within the document
    pub span: Option<ByteSpan>,
}

impl RawAnswer {
    /// Create an answer with text and offsets
    pub fn new(text: impl Into<String>, score: f32, start: usize, end: usize) -> Self {
        Self {
            text: Some(text.into()),
            score,
            span: Some(ByteSpan::new(start, end)),
        }
    }

    /// Create a no-answer response
    pub fn no_answer(score: f32) -> Self {
        Self {
            text: None,
            score,
            span: None,
        }
    }

    /// True when the reader declined to answer or returned an empty span
    pub fn is_no_answer(&self) -> bool {
        self.text.as_deref().map(str::is_empty).unwrap_or(true)
    }
}

/// A final extracted instance of the abstract concept.
///
/// The score is the raw reader confidence, rounded to 4 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInstance {
    pub text: String,
    pub score: f32,
}

impl ExtractedInstance {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for extractive question-answering backends.
///
/// Given a query and a single document, a reader returns candidate answer
/// spans with confidence scores and character offsets, possibly including a
/// no-answer response. Readers are constructed once with a fixed top-k and
/// reused read-only across extraction calls; the `Send + Sync` bound makes
/// that sharing contract explicit. Implementations that are not reentrant
/// must serialize their own invocations.
#[async_trait::async_trait]
pub trait AnswerReader: Send + Sync {
    /// Run one query against one document
    async fn read(&self, query: &str, document: &str) -> Result<Vec<RawAnswer>>;

    /// Get reader name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_encloses_inclusive() {
        let outer = ByteSpan::new(10, 20);
        assert!(outer.encloses(&ByteSpan::new(12, 18)));
        assert!(outer.encloses(&ByteSpan::new(10, 20)));
        assert!(!outer.encloses(&ByteSpan::new(9, 15)));
        assert!(!outer.encloses(&ByteSpan::new(15, 21)));
    }

    #[test]
    fn test_no_answer_detection() {
        assert!(RawAnswer::no_answer(0.7).is_no_answer());
        assert!(RawAnswer {
            text: Some(String::new()),
            score: 0.5,
            span: None,
        }
        .is_no_answer());
        assert!(!RawAnswer::new("Narthul", 0.9, 0, 7).is_no_answer());
    }

    #[test]
    fn test_raw_answer_serde_roundtrip() {
        let answer = RawAnswer::new("Ignis", 0.8123, 42, 47);
        let json = serde_json::to_string(&answer).unwrap();
        let back: RawAnswer = serde_json::from_str(&json).unwrap();
        assert_eq!(answer, back);
    }
}
