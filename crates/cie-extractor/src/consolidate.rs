//! Answer Consolidation module
//!
//! Normalizes raw reader scores and collapses geometrically overlapping
//! duplicate spans, keeping the highest-normalized-score representative per
//! overlapping cluster.

use std::cmp::Ordering;

use cie_core::{ByteSpan, RawAnswer};

/// A raw answer that survived consolidation, with its derived attributes.
///
/// `normalized_score` is computed exactly once from the answer's own raw
/// score and text length and is never recomputed. `is_proper` is tagged by
/// the orchestrator after consolidation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub score: f32,
    pub span: Option<ByteSpan>,
    pub normalized_score: f32,
    pub is_proper: bool,
}

/// Normalize a raw confidence score by a log-length term.
///
/// Raw extractive-QA confidence is biased toward short spans; dividing by
/// `ln(len + 1.1)` discounts degenerate very-short high-confidence spans
/// relative to longer, more informative ones.
fn normalized_score(score: f32, text: &str) -> f32 {
    score / (text.chars().count() as f32 + 1.1).ln()
}

/// Containment-overlap predicate for two optional spans.
///
/// Two spans overlap iff one interval is fully contained within the other,
/// inclusive on both ends. Partial (non-containing) intersections are not
/// duplicates. Returns `false` when either operand lacks offsets, so answers
/// missing span metadata are never merged.
pub fn containment_overlap(a: Option<ByteSpan>, b: Option<ByteSpan>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.encloses(&b) || b.encloses(&a),
        _ => false,
    }
}

/// Consolidate pooled raw answers into ranked candidates.
///
/// Answers are processed greedily in descending normalized-score order;
/// empty-text (no-answer) responses are dropped, and an answer is kept only
/// if it does not containment-overlap any already-kept answer. A
/// high-confidence long span therefore subsumes a low-confidence short span
/// nested inside it, while disjoint-but-adjacent mentions of the same word
/// both survive.
pub fn consolidate(answers: Vec<RawAnswer>) -> Vec<Candidate> {
    let mut scored: Vec<(RawAnswer, f32)> = answers
        .into_iter()
        .map(|ans| {
            let norm = match ans.text.as_deref() {
                Some(text) if !text.is_empty() => normalized_score(ans.score, text),
                _ => 0.0,
            };
            (ans, norm)
        })
        .collect();

    scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let mut kept: Vec<Candidate> = Vec::new();

    for (ans, norm) in scored {
        if ans.is_no_answer() {
            continue;
        }

        let overlaps = kept
            .iter()
            .any(|k| containment_overlap(ans.span, k.span));

        if !overlaps {
            kept.push(Candidate {
                // is_no_answer() ruled out an absent text above
                text: ans.text.unwrap_or_default(),
                score: ans.score,
                span: ans.span,
                normalized_score: norm,
                is_proper: false,
            });
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn answer(text: &str, score: f32, start: usize, end: usize) -> RawAnswer {
        RawAnswer::new(text, score, start, end)
    }

    #[test]
    fn test_normalization_monotonic_in_length() {
        // Same raw score, shorter text wins
        let short = normalized_score(0.8, "Ignis");
        let long = normalized_score(0.8, "Ignis the silver dragon");
        assert!(short > long);
    }

    #[test]
    fn test_containment_overlap_basics() {
        let outer = Some(ByteSpan::new(0, 20));
        let inner = Some(ByteSpan::new(5, 10));
        let partial = Some(ByteSpan::new(15, 25));

        assert!(containment_overlap(outer, inner));
        assert!(containment_overlap(inner, outer));
        // Partial intersection is not a containment overlap
        assert!(!containment_overlap(outer, partial));
        // Missing offsets never merge
        assert!(!containment_overlap(None, outer));
        assert!(!containment_overlap(outer, None));
        assert!(!containment_overlap(None, None));
    }

    #[test]
    fn test_consolidate_ranked_by_normalized_score() {
        let answers = vec![
            answer("Mirehaven", 0.5, 0, 9),
            answer("Aerith", 0.9, 20, 26),
        ];

        let kept = consolidate(answers);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].text, "Aerith");
        assert!(kept[0].normalized_score >= kept[1].normalized_score);
    }

    #[test]
    fn test_consolidate_drops_no_answer() {
        let answers = vec![RawAnswer::no_answer(0.99), answer("Ignis", 0.4, 5, 10)];

        let kept = consolidate(answers);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "Ignis");
    }

    #[test]
    fn test_consolidate_nested_spans_keep_best_normalized() {
        // Three mutually nested spans; the survivor is whichever has the
        // highest normalized score, not necessarily the outermost.
        let outer = answer("the great dragon Narthul", 0.50, 0, 24);
        let middle = answer("dragon Narthul", 0.70, 10, 24);
        let inner = answer("Narthul", 0.85, 17, 24);

        let norms = [
            normalized_score(0.50, "the great dragon Narthul"),
            normalized_score(0.70, "dragon Narthul"),
            normalized_score(0.85, "Narthul"),
        ];
        let best = norms
            .iter()
            .cloned()
            .fold(f32::MIN, f32::max);
        // The inner span wins here: shortest text, highest raw score
        assert!((best - norms[2]).abs() < f32::EPSILON);

        let kept = consolidate(vec![outer, middle, inner]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "Narthul");
    }

    #[test]
    fn test_consolidate_adjacent_same_word_both_kept() {
        // Two disjoint mentions of the same word are plausibly two entities
        let answers = vec![answer("Ignis", 0.8, 10, 15), answer("Ignis", 0.7, 40, 45)];

        let kept = consolidate(answers);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_consolidate_missing_offsets_never_merged() {
        let with_span = answer("Narthul", 0.9, 0, 7);
        let without_span = RawAnswer {
            text: Some("Narthul".to_string()),
            score: 0.8,
            span: None,
        };

        let kept = consolidate(vec![with_span, without_span]);
        assert_eq!(kept.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_containment_overlap_symmetric(
            s1 in 0usize..500, l1 in 0usize..100,
            s2 in 0usize..500, l2 in 0usize..100,
        ) {
            let a = Some(ByteSpan::new(s1, s1 + l1));
            let b = Some(ByteSpan::new(s2, s2 + l2));
            prop_assert_eq!(containment_overlap(a, b), containment_overlap(b, a));
        }

        #[test]
        fn prop_span_overlaps_itself(s in 0usize..500, l in 0usize..100) {
            let span = Some(ByteSpan::new(s, s + l));
            prop_assert!(containment_overlap(span, span));
        }

        #[test]
        fn prop_normalization_monotonic(
            score in 0.01f32..1.0,
            short_len in 1usize..20,
            extra in 1usize..40,
        ) {
            let short_text: String = "x".repeat(short_len);
            let long_text: String = "x".repeat(short_len + extra);
            prop_assert!(
                normalized_score(score, &short_text) > normalized_score(score, &long_text)
            );
        }

        #[test]
        fn prop_consolidated_candidates_never_nested(
            spans in prop::collection::vec((0usize..100, 1usize..30), 0..12)
        ) {
            let answers: Vec<RawAnswer> = spans
                .iter()
                .enumerate()
                .map(|(i, (start, len))| {
                    answer(&format!("span{i}"), 0.5, *start, start + len)
                })
                .collect();

            let kept = consolidate(answers);
            for (i, a) in kept.iter().enumerate() {
                for b in kept.iter().skip(i + 1) {
                    prop_assert!(!containment_overlap(a.span, b.span));
                }
            }
        }
    }
}
