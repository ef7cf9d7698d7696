//! Lexical entropy signals
//!
//! Information-theoretic measures over word and character distributions.
//! Degenerate generation (loops, collapse into a few tokens) shows up as low
//! entropy relative to length, repeated n-grams, and windows where the local
//! distribution narrows.

mod patterns;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::text;

pub use patterns::{detect_entropy_patterns, EntropyPatterns, EntropyTrend};

/// Weight of vocabulary diversity in the entropy quality ratio
const DIVERSITY_WEIGHT: f64 = 0.4;
/// Weight of the unique-token ratio in the entropy quality ratio
const UNIQUE_WEIGHT: f64 = 0.4;
/// Weight of n-gram novelty (1 - repetition ratio) in the entropy quality ratio
const NOVELTY_WEIGHT: f64 = 0.2;

/// Entropy measures over content words (stop words removed)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyMetrics {
    /// Shannon entropy of the word distribution, in bits
    pub vocab_entropy: f64,
    /// Entropy normalized by its maximum for this vocabulary, 0-1
    pub vocab_diversity: f64,
    /// Distinct words over total words, 0-1
    pub unique_ratio: f64,
    pub unique_words: usize,
    pub total_words: usize,
}

/// Full entropy profile of a text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntropyProfile {
    pub token_entropy: f64,
    pub char_entropy: f64,
    pub bigram_entropy: f64,
    pub trigram_entropy: f64,
    /// Blend of diversity, uniqueness and n-gram novelty, 0-1
    pub entropy_quality_ratio: f64,
    pub word_count: usize,
    pub vocabulary: VocabularyMetrics,
    pub patterns: EntropyPatterns,
}

/// Differences between two entropy profiles (first minus second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyComparison {
    pub token_entropy_diff: f64,
    pub vocab_entropy_diff: f64,
    pub vocab_diversity_diff: f64,
    /// 1 when token entropies match, approaching 0 as they diverge
    pub entropy_similarity: f64,
}

/// Shannon entropy (bits) of a frequency table
fn entropy_of<T: Eq + Hash>(items: impl IntoIterator<Item = T>) -> f64 {
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut total = 0usize;
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    // A single-symbol distribution can come out as -0.0
    entropy.max(0.0)
}

/// Entropy of `tokens` divided by its maximum, log2 of the distinct count
pub(crate) fn normalized_entropy(tokens: &[String]) -> f64 {
    let unique = tokens.iter().collect::<HashSet<_>>().len();
    if unique <= 1 {
        return 0.0;
    }
    (entropy_of(tokens.iter()) / (unique as f64).log2()).clamp(0.0, 1.0)
}

/// Shannon entropy of the lower-cased word distribution
pub fn shannon_entropy(text: &str) -> f64 {
    entropy_of(text::words(text))
}

/// Shannon entropy of non-whitespace characters
pub fn char_entropy(text: &str) -> f64 {
    entropy_of(
        text.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase),
    )
}

/// Shannon entropy of word n-grams; 0 when the text has fewer than `n` words
pub fn ngram_entropy(text: &str, n: usize) -> f64 {
    let words = text::words(text);
    if n == 0 || words.len() < n {
        return 0.0;
    }
    entropy_of(words.windows(n))
}

/// Vocabulary entropy, diversity and unique-word ratio over content words
pub fn vocabulary_metrics(text: &str) -> VocabularyMetrics {
    let words = text::tokenize(text);
    let total_words = words.len();
    if total_words == 0 {
        return VocabularyMetrics::default();
    }

    let unique_words = words.iter().collect::<HashSet<_>>().len();

    VocabularyMetrics {
        vocab_entropy: entropy_of(words.iter()),
        vocab_diversity: normalized_entropy(&words),
        unique_ratio: unique_words as f64 / total_words as f64,
        unique_words,
        total_words,
    }
}

/// Compute the full entropy profile of `text`
pub fn analyze_entropy_profile(text: &str) -> EntropyProfile {
    let words = text::words(text);
    let vocabulary = vocabulary_metrics(text);
    let patterns = detect_entropy_patterns(text);

    let entropy_quality_ratio = if words.is_empty() {
        0.0
    } else {
        (DIVERSITY_WEIGHT * vocabulary.vocab_diversity
            + UNIQUE_WEIGHT * vocabulary.unique_ratio
            + NOVELTY_WEIGHT * (1.0 - patterns.repetition_ratio))
            .clamp(0.0, 1.0)
    };

    EntropyProfile {
        token_entropy: entropy_of(words.iter()),
        char_entropy: char_entropy(text),
        bigram_entropy: ngram_entropy(text, 2),
        trigram_entropy: ngram_entropy(text, 3),
        entropy_quality_ratio,
        word_count: words.len(),
        vocabulary,
        patterns,
    }
}

/// Compare the entropy profiles of two texts
pub fn compare_entropy_profiles(first: &str, second: &str) -> EntropyComparison {
    let (token_a, token_b) = (shannon_entropy(first), shannon_entropy(second));
    let a = vocabulary_metrics(first);
    let b = vocabulary_metrics(second);

    let larger = token_a.max(token_b);
    let entropy_similarity = if larger == 0.0 {
        1.0
    } else {
        (1.0 - (token_a - token_b).abs() / larger).clamp(0.0, 1.0)
    };

    EntropyComparison {
        token_entropy_diff: token_a - token_b,
        vocab_entropy_diff: a.vocab_entropy - b.vocab_entropy,
        vocab_diversity_diff: a.vocab_diversity - b.vocab_diversity,
        entropy_similarity,
    }
}
