//! Repetition and local-entropy pattern detection

use serde::{Deserialize, Serialize};

use super::entropy_of;
use crate::text;

/// Trigram repetition ratio at which a text counts as repetitive
const REPETITION_THRESHOLD: f64 = 0.25;
/// Words per local-entropy window
const WINDOW_SIZE: usize = 8;
/// Words between window starts
const WINDOW_STEP: usize = 4;
/// Windows whose normalized entropy falls below this count as drops
const LOCAL_DROP_RATIO: f64 = 0.8;
/// Change in normalized entropy between halves that counts as a trend
const TREND_DELTA: f64 = 0.1;

/// Direction of entropy between the first and second half of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyTrend {
    Increasing,
    #[default]
    Stable,
    Decreasing,
}

impl std::fmt::Display for EntropyTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntropyTrend::Increasing => "increasing",
            EntropyTrend::Stable => "stable",
            EntropyTrend::Decreasing => "decreasing",
        };
        f.write_str(name)
    }
}

/// Repetition and local-entropy patterns of a text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntropyPatterns {
    pub has_repetitive_patterns: bool,
    /// Share of word trigrams that repeat an earlier trigram, 0-1
    pub repetition_ratio: f64,
    pub entropy_trend: EntropyTrend,
    /// Windows whose local entropy collapses
    pub local_entropy_drops: usize,
}

/// Entropy of `words` as a share of the maximum for their count
fn local_entropy(words: &[String]) -> f64 {
    if words.len() <= 1 {
        return 0.0;
    }
    (entropy_of(words.iter()) / (words.len() as f64).log2()).clamp(0.0, 1.0)
}

fn repetition_ratio(words: &[String]) -> f64 {
    if words.len() < 3 {
        return 0.0;
    }
    let trigrams: Vec<&[String]> = words.windows(3).collect();
    let unique = trigrams
        .iter()
        .collect::<std::collections::HashSet<_>>()
        .len();
    1.0 - unique as f64 / trigrams.len() as f64
}

fn local_entropy_drops(words: &[String]) -> usize {
    if words.len() < WINDOW_SIZE {
        return 0;
    }
    (0..=words.len() - WINDOW_SIZE)
        .step_by(WINDOW_STEP)
        .filter(|&start| local_entropy(&words[start..start + WINDOW_SIZE]) < LOCAL_DROP_RATIO)
        .count()
}

fn entropy_trend(words: &[String]) -> EntropyTrend {
    if words.len() < 2 * WINDOW_SIZE {
        return EntropyTrend::Stable;
    }
    let (first, second) = words.split_at(words.len() / 2);
    let delta = local_entropy(second) - local_entropy(first);

    if delta > TREND_DELTA {
        EntropyTrend::Increasing
    } else if delta < -TREND_DELTA {
        EntropyTrend::Decreasing
    } else {
        EntropyTrend::Stable
    }
}

/// Detect repetition and local-entropy patterns in `text`
pub fn detect_entropy_patterns(text: &str) -> EntropyPatterns {
    let words = text::words(text);
    let repetition_ratio = repetition_ratio(&words);

    EntropyPatterns {
        has_repetitive_patterns: repetition_ratio >= REPETITION_THRESHOLD,
        repetition_ratio,
        entropy_trend: entropy_trend(&words),
        local_entropy_drops: local_entropy_drops(&words),
    }
}
