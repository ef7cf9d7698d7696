//! Marker lexicons and detectors for final-segment inspection
//!
//! Patterns compile once on first use. A pattern that fails to compile is
//! logged and skipped, so detection degrades to "no match" instead of failing.

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

use crate::text;

static STRUCTURE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static CLOSURE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static HEDGE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static DELIVERY_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static ORDERED_ITEM: OnceLock<Option<Regex>> = OnceLock::new();

/// Hedging markers needed before filler can outweigh closure markers
const HEDGE_DOMINANCE_MIN: usize = 3;

/// Minimum consecutive lines for a verse-style deliverable
const VERSE_MIN_LINES: usize = 3;

/// Ordered list items needed to count as enumerated analytical points
const ENUMERATED_POINTS_MIN: usize = 2;

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern, error = %e, "Failed to compile segment marker regex");
                None
            }
        })
        .collect()
}

fn structure_patterns() -> &'static [Regex] {
    STRUCTURE_PATTERNS.get_or_init(|| {
        compile_all(&[
            // **bold** emphasis
            r"\*\*[^*\n]+\*\*",
            // ## markdown headers
            r"(?m)^\s*#{2,}\s*\S",
            // 1. ordered list items
            r"(?m)^\s*\d+[.)]\s+\S",
            // - bullets
            r"(?m)^\s*[-*•]\s+\S",
            // --- separators
            r"(?m)^\s*(?:-{3,}|\*{3,}|_{3,})\s*$",
            // Step 1: / Step:
            r"(?i)\bstep\s*(?:\d+|:)",
        ])
    })
}

fn closure_patterns() -> &'static [Regex] {
    CLOSURE_PATTERNS.get_or_init(|| {
        compile_all(&[
            r"(?i)\btherefore\b",
            r"(?i)\bthus\b",
            r"(?i)\bhence\b",
            r"(?i)\bconsequently\b",
            r"(?i)\bin conclusion\b",
            r"(?i)\bin summary\b",
            r"(?i)\bto summari[sz]e\b",
            r"(?i)\bfinally\b",
            r"(?i)\bfinal answer\b",
            r"(?i)\bthe completed\b",
            // **Completed ...** or ## Completed ... heading
            r"(?im)^\s*(?:\*\*|#+\s*)completed\b",
            r"(?i)\bwe can conclude\b",
        ])
    })
}

fn hedge_patterns() -> &'static [Regex] {
    HEDGE_PATTERNS.get_or_init(|| {
        compile_all(&[
            r"(?i)\bmaybe\b",
            r"(?i)\bperhaps\b",
            r"(?i)\bactually\b",
            r"(?i)\bwait\b",
            r"(?i)\bhmm+\b",
            r"(?i)\blet['’]?s think\b",
            r"(?i)\blet me (?:think|reconsider|try|approach)\b",
            r"(?i)\bi['’]?m not sure\b",
        ])
    })
}

fn delivery_patterns() -> &'static [Regex] {
    DELIVERY_PATTERNS.get_or_init(|| {
        compile_all(&[
            // > quoted deliverable
            r"(?m)^\s*>\s*\S",
            // = <value>
            r"=\s*[-+]?[\d√π(]",
            r"(?i)\banswer\s+is\b",
            r"(?i)\bresult\s+is\b",
            r"(?i)\bequals\s+[-+]?\d",
            // "X" translates to Y
            r"(?i)\btranslat(?:es|ed)\s+(?:to|as)\b",
        ])
    })
}

fn ordered_item() -> Option<&'static Regex> {
    ORDERED_ITEM
        .get_or_init(|| {
            let mut compiled = compile_all(&[r"(?m)^\s*\d+[.)]\s+\S"]);
            compiled.pop()
        })
        .as_ref()
}

fn count_matches(patterns: &[Regex], segment: &str) -> usize {
    patterns
        .iter()
        .map(|re| re.find_iter(segment).count())
        .sum()
}

/// True when the segment carries any structural formatting marker
pub fn has_structure_markers(segment: &str) -> bool {
    structure_patterns().iter().any(|re| re.is_match(segment))
}

/// Number of closure/conclusion markers in the segment
pub fn closure_marker_count(segment: &str) -> usize {
    count_matches(closure_patterns(), segment)
}

/// Number of hedging or meta-reasoning filler markers in the segment
pub fn hedge_marker_count(segment: &str) -> usize {
    count_matches(hedge_patterns(), segment)
}

/// True when hedging filler outweighs closure markers
pub fn hedging_dominates(hedges: usize, closures: usize) -> bool {
    hedges >= HEDGE_DOMINANCE_MIN && hedges > 2 * closures
}

/// True when the segment contains a concrete deliverable
pub fn has_delivery_markers(segment: &str) -> bool {
    if delivery_patterns().iter().any(|re| re.is_match(segment)) {
        return true;
    }

    let enumerated = ordered_item()
        .map(|re| re.find_iter(segment).count())
        .unwrap_or(0);
    if enumerated >= ENUMERATED_POINTS_MIN {
        return true;
    }

    has_verse_block(segment)
}

/// A run of short declarative lines reading as delivered creative output
/// (praise lines, stanzas). Filler and trailing-off lines break the run.
fn has_verse_block(segment: &str) -> bool {
    let mut run = 0;
    let mut run_has_comma = false;

    for line in text::non_blank_lines(segment) {
        if is_verse_line(line) {
            run += 1;
            run_has_comma |= line.ends_with(',');
            if run >= VERSE_MIN_LINES && run_has_comma {
                return true;
            }
        } else {
            run = 0;
            run_has_comma = false;
        }
    }

    false
}

fn is_verse_line(line: &str) -> bool {
    let starts_upper = line.chars().next().is_some_and(char::is_uppercase);
    let ends_cleanly = matches!(line.chars().last(), Some(',' | ';' | '.'))
        && !line.ends_with("...")
        && !line.ends_with('…');
    let word_count = line.split_whitespace().count();

    starts_upper
        && ends_cleanly
        && (2..=20).contains(&word_count)
        && hedge_marker_count(line) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hedging_dominates_requires_minimum() {
        assert!(!hedging_dominates(2, 0));
        assert!(hedging_dominates(3, 0));
        assert!(hedging_dominates(3, 1));
        assert!(!hedging_dominates(4, 2));
    }

    #[test]
    fn test_hedge_count_on_filler() {
        let text = "Maybe we should... I'm not sure... Let's think... Actually wait...";
        assert_eq!(hedge_marker_count(text), 5);
    }

    #[test]
    fn test_verse_block_needs_three_lines() {
        assert!(!has_verse_block("Protector of children,\nGuardian of rivers."));
        assert!(has_verse_block(
            "Protector of children,\nGuardian of rivers,\nStrong one of the forest."
        ));
    }

    #[test]
    fn test_verse_block_rejects_trailing_filler() {
        let text = "Let me think about this...\nActually, I'm not sure...\nMaybe I should reconsider...";
        assert!(!has_verse_block(text));
    }

    #[test]
    fn test_subtraction_is_not_a_bullet() {
        assert!(!has_structure_markers("Compute base - xy? That yields base - xy."));
    }
}
