//! Base evaluation seam
//!
//! The loop-recovery stage consumes a baseline score and an optional
//! coherence diagnostic. [`HeuristicBaseline`] derives both from the text's
//! entropy and consistency signals; [`StaticBaseline`] replays values an
//! upstream evaluator already produced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{CoherenceFailure, INCOMPLETE_RESPONSE, REPETITIVE_LOOP};
use crate::consistency::{self, ConsistencyReport};
use crate::entropy::{self, EntropyProfile};
use crate::scoring::{MAX_SCORE, MIN_SCORE};
use crate::segment::markers;
use crate::text;

/// Occurrences of one fragment that make a loop
const LOOP_MIN_REPETITIONS: usize = 3;
/// Fragments shorter than this are ignored when counting repeats
const LOOP_MIN_FRAGMENT_CHARS: usize = 12;
/// Meta-reasoning markers that alone make a loop
const META_LOOP_MIN_MARKERS: usize = 4;

const ENTROPY_WEIGHT: f64 = 0.5;
const CONSISTENCY_WEIGHT: f64 = 0.3;
const DIVERSITY_WEIGHT: f64 = 0.2;

/// Output of a base evaluator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaselineResult {
    /// Baseline quality, 0-100
    pub overall_score: f64,
    pub coherence_failure: Option<CoherenceFailure>,
}

/// Entropy and consistency signals of one response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSignals {
    pub entropy: EntropyProfile,
    pub consistency: ConsistencyReport,
}

impl TextSignals {
    pub fn analyze(text: &str) -> Self {
        Self {
            entropy: entropy::analyze_entropy_profile(text),
            consistency: consistency::analyze_consistency(text),
        }
    }
}

/// Produces the baseline score and coherence diagnostic for a response
pub trait BaselineEvaluator {
    fn evaluate_baseline(&self, text: &str) -> BaselineResult;

    /// Evaluate reusing signals already computed for `text`
    fn evaluate_with_signals(&self, text: &str, _signals: &TextSignals) -> BaselineResult {
        self.evaluate_baseline(text)
    }
}

/// Baseline derived from lexical entropy and consistency signals
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicBaseline;

impl HeuristicBaseline {
    /// Diagnose repetition loops and unfinished responses
    pub fn detect_coherence_failure(&self, text: &str) -> Option<CoherenceFailure> {
        if let Some((fragment, repetitions)) = most_repeated_fragment(text) {
            if repetitions >= LOOP_MIN_REPETITIONS {
                return Some(CoherenceFailure::repetitive_loop(fragment, repetitions));
            }
        }

        let meta_markers = markers::hedge_marker_count(text);
        if meta_markers >= META_LOOP_MIN_MARKERS {
            return Some(CoherenceFailure {
                repetitions: meta_markers,
                ..CoherenceFailure::new(REPETITIVE_LOOP)
            });
        }

        if consistency::is_incomplete_response(text) {
            return Some(CoherenceFailure::new(INCOMPLETE_RESPONSE));
        }

        None
    }
}

impl BaselineEvaluator for HeuristicBaseline {
    fn evaluate_baseline(&self, text: &str) -> BaselineResult {
        self.evaluate_with_signals(text, &TextSignals::analyze(text))
    }

    fn evaluate_with_signals(&self, text: &str, signals: &TextSignals) -> BaselineResult {
        let profile = &signals.entropy;
        let report = &signals.consistency;

        let blended = ENTROPY_WEIGHT * profile.entropy_quality_ratio
            + CONSISTENCY_WEIGHT * report.consistency_score
            + DIVERSITY_WEIGHT * profile.vocabulary.vocab_diversity;
        let overall_score = (blended * MAX_SCORE).clamp(MIN_SCORE, MAX_SCORE);
        let coherence_failure = self.detect_coherence_failure(text);

        debug!(
            overall_score,
            failure_type = coherence_failure.as_ref().map(|f| f.failure_type.as_str()),
            "baseline_evaluation"
        );

        BaselineResult {
            overall_score,
            coherence_failure,
        }
    }
}

/// Baseline that returns fixed, caller-supplied values
#[derive(Debug, Clone, Default)]
pub struct StaticBaseline {
    result: BaselineResult,
}

impl StaticBaseline {
    pub fn new(overall_score: f64, coherence_failure: Option<CoherenceFailure>) -> Self {
        Self {
            result: BaselineResult {
                overall_score: overall_score.clamp(MIN_SCORE, MAX_SCORE),
                coherence_failure,
            },
        }
    }
}

impl BaselineEvaluator for StaticBaseline {
    fn evaluate_baseline(&self, _text: &str) -> BaselineResult {
        self.result.clone()
    }
}

/// The normalized line or sentence repeated most often, with its count.
///
/// Ties keep the fragment seen first.
fn most_repeated_fragment(text: &str) -> Option<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    let lines = text::non_blank_lines(text);
    let sentences = text::sentences(text);
    for fragment in lines.into_iter().chain(sentences) {
        let normalized = text::normalize(fragment);
        if text::char_len(&normalized) < LOOP_MIN_FRAGMENT_CHARS {
            continue;
        }
        let count = counts.entry(normalized.clone()).or_insert(0);
        if *count == 0 {
            order.push(normalized);
        }
        *count += 1;
    }

    let mut best: Option<(String, usize)> = None;
    for fragment in order {
        let count = counts.get(&fragment).copied().unwrap_or(0);
        let better = best.as_ref().map_or(true, |(_, top)| count > *top);
        if better {
            best = Some((fragment, count));
        }
    }
    best
}
