//! Consistency signals: contradictions, cross-response agreement, completeness

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text;

/// Vocabulary asserting a statement holds
const AFFIRMING: &[&str] = &[
    "correct", "true", "right", "yes", "accurate", "valid", "agree", "confirmed",
];

/// Vocabulary asserting a statement fails
const NEGATING: &[&str] = &[
    "wrong", "false", "incorrect", "no", "inaccurate", "invalid", "disagree", "refuted",
];

/// Words a finished sentence never ends on
const DANGLING_CONNECTIVES: &[&str] = &[
    "and", "or", "but", "so", "because", "with", "of", "on", "to", "the", "a", "an", "that",
    "which", "if", "then", "is", "are",
];

/// Deducted from the consistency score of a response that trails off
const INCOMPLETE_PENALTY: f64 = 0.25;

/// Short unpunctuated fragments up to this many words read as cut off
const FRAGMENT_MAX_WORDS: usize = 3;

/// Consistency signals for a single response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Strongest polarity conflict between two sentences, 0-1
    pub internal_contradiction: f64,
    /// Response trails off or stops mid-thought
    pub incomplete: bool,
    /// 1 for a complete, self-consistent response, 0-1
    pub consistency_score: f64,
}

/// Net polarity and the number of polarity words in a statement
fn polarity(statement: &str) -> (i64, usize) {
    let words = text::words(statement);
    let affirming = words.iter().filter(|w| AFFIRMING.contains(&w.as_str())).count();
    let negating = words.iter().filter(|w| NEGATING.contains(&w.as_str())).count();
    (affirming as i64 - negating as i64, affirming + negating)
}

/// Contradiction between two polarities, 0-1
fn opposition((net_a, total_a): (i64, usize), (net_b, total_b): (i64, usize)) -> f64 {
    if net_a * net_b >= 0 {
        return 0.0;
    }

    let opposed = (net_a.abs() + net_b.abs()) as f64;
    (opposed / (total_a + total_b) as f64).clamp(0.0, 1.0)
}

/// Degree to which two statements take opposite positions, 0-1
pub fn detect_contradiction(a: &str, b: &str) -> f64 {
    opposition(polarity(a), polarity(b))
}

/// Strongest contradiction between any two sentences of `text`.
///
/// Only sentences leaning one way can conflict, and sentences with the same
/// polarity score identically, so each side is reduced to its distinct
/// polarities before pairing.
pub fn internal_contradiction(text: &str) -> f64 {
    let mut affirming: HashSet<(i64, usize)> = HashSet::new();
    let mut negating: HashSet<(i64, usize)> = HashSet::new();

    for sentence in text::sentences(text) {
        let lean = polarity(sentence);
        if lean.0 > 0 {
            affirming.insert(lean);
        } else if lean.0 < 0 {
            negating.insert(lean);
        }
    }

    let mut strongest: f64 = 0.0;
    for &a in &affirming {
        for &b in &negating {
            strongest = strongest.max(opposition(a, b));
        }
    }
    strongest
}

fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Mean pairwise agreement between responses to the same question.
///
/// Agreement is Jaccard similarity over stemmed content words. Fewer than
/// two responses are trivially consistent.
pub fn response_consistency<S: AsRef<str>>(responses: &[S]) -> f64 {
    if responses.len() < 2 {
        return 1.0;
    }

    let token_sets: Vec<HashSet<String>> = responses
        .iter()
        .map(|r| {
            text::tokenize_with_stemming(r.as_ref(), true)
                .into_iter()
                .collect()
        })
        .collect();

    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in token_sets.iter().enumerate() {
        for b in &token_sets[i + 1..] {
            total += jaccard_similarity(a, b);
            pairs += 1;
        }
    }

    (total / pairs as f64).clamp(0.0, 1.0)
}

/// True when a response trails off instead of finishing.
///
/// Trailing ellipses, a final dangling connective, or a short unpunctuated
/// fragment ending in a word all count; empty text is incomplete.
pub fn is_incomplete_response(response: &str) -> bool {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.ends_with("...") || trimmed.ends_with('…') {
        return true;
    }
    if trimmed.ends_with(['.', '!', '?', '。', '！', '？']) {
        return false;
    }

    let words = text::words(trimmed);
    let Some(last) = words.last() else {
        return false;
    };
    if DANGLING_CONNECTIVES.contains(&last.as_str()) {
        return true;
    }

    let ends_in_word = trimmed.chars().last().is_some_and(char::is_alphabetic);
    ends_in_word && words.len() <= FRAGMENT_MAX_WORDS && words.len() > 1
}

/// Consistency signals for a single response
pub fn analyze_consistency(response: &str) -> ConsistencyReport {
    let internal_contradiction = internal_contradiction(response);
    let incomplete = is_incomplete_response(response);

    let mut consistency_score = 1.0 - internal_contradiction;
    if incomplete {
        consistency_score -= INCOMPLETE_PENALTY;
    }

    ConsistencyReport {
        internal_contradiction,
        incomplete,
        consistency_score: consistency_score.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposed_statements_contradict() {
        let opposed = detect_contradiction(
            "This is definitely correct and true.",
            "This is completely wrong and false.",
        );
        let agreeing = detect_contradiction("This is correct.", "This is accurate.");

        assert_eq!(opposed, 1.0);
        assert_eq!(agreeing, 0.0);
    }

    #[test]
    fn test_neutral_statement_never_contradicts() {
        assert_eq!(detect_contradiction("The sky is blue.", "That is wrong."), 0.0);
    }

    #[test]
    fn test_internal_contradiction_finds_conflicting_sentences() {
        let contradictory = "The answer is definitely yes, this is correct. However, I must say \
                             that this is completely wrong and false.";
        let steady = "The research clearly demonstrates that renewable energy is beneficial. \
                      Therefore, transitioning to clean energy is important.";

        assert_eq!(internal_contradiction(contradictory), 1.0);
        assert_eq!(internal_contradiction(steady), 0.0);
        assert_eq!(internal_contradiction(""), 0.0);
    }

    #[test]
    fn test_internal_contradiction_matches_every_sentence_pair() {
        let text = "It is correct and right but wrong. Right, it is valid and true but wrong. \
                    No, it is false, though true. The weather is mild.";
        let sentences = text::sentences(text);

        let mut expected: f64 = 0.0;
        for (i, a) in sentences.iter().enumerate() {
            for b in &sentences[i + 1..] {
                expected = expected.max(detect_contradiction(a, b));
            }
        }

        assert!(expected > 0.0 && expected < 1.0);
        assert_eq!(internal_contradiction(text), expected);
    }

    #[test]
    fn test_internal_contradiction_on_long_loops() {
        let neutral = "Let me think about this. ".repeat(20_000);
        assert_eq!(internal_contradiction(&neutral), 0.0);

        let flipping = "Yes, that is right. No, that is wrong. ".repeat(10_000);
        assert_eq!(internal_contradiction(&flipping), 1.0);
    }

    #[test]
    fn test_paraphrases_are_more_consistent_than_disagreements() {
        let consistent = [
            "Paris is the capital of France.",
            "The capital of France is Paris.",
            "France's capital city is Paris.",
        ];
        let inconsistent = [
            "Paris is the capital of France.",
            "London is the capital of France.",
            "I don't know the capital of France.",
        ];

        let high = response_consistency(&consistent);
        let low = response_consistency(&inconsistent);
        assert!(high > low, "{high} <= {low}");
        assert!((0.0..=1.0).contains(&high));
        assert!((0.0..=1.0).contains(&low));
    }

    #[test]
    fn test_single_response_is_consistent() {
        assert_eq!(response_consistency(&["anything"]), 1.0);
        assert_eq!(response_consistency::<&str>(&[]), 1.0);
    }

    #[test]
    fn test_incomplete_responses() {
        for response in ["The answer is...", "This depends on", "Well, and", "I think", "", "Then…"] {
            assert!(is_incomplete_response(response), "{response:?}");
        }
    }

    #[test]
    fn test_complete_responses() {
        for response in [
            "The answer is 42.",
            "This depends on several factors including temperature and pressure.",
            "Well, the solution involves multiple steps.",
            "I think this is the correct approach based on the evidence.",
            "2 + 2 = 4",
            "Yes",
        ] {
            assert!(!is_incomplete_response(response), "{response:?}");
        }
    }

    #[test]
    fn test_report_combines_signals() {
        let report = analyze_consistency("The result is correct. No, the result is wrong.");
        assert_eq!(report.internal_contradiction, 1.0);
        assert_eq!(report.consistency_score, 0.0);

        let report = analyze_consistency("The capital of France is Paris.");
        assert_eq!(report.consistency_score, 1.0);
        assert!(!report.incomplete);

        let report = analyze_consistency("Let me think about this...");
        assert!(report.incomplete);
        assert_eq!(report.consistency_score, 0.75);
    }
}
