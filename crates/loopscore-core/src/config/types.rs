//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::scoring;
use crate::segment;

/// Calibration for every scoring stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Final-segment quality analysis
    #[serde(default)]
    pub segment: SegmentCalibration,

    /// Hybrid loop-recovery scoring
    #[serde(default)]
    pub scoring: ScoringCalibration,
}

/// Final-segment analysis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentCalibration {
    pub base_quality: f64,
    pub structure_bonus: f64,
    pub coherence_bonus: f64,
    pub content_bonus: f64,
    pub length_bonus_max: f64,
    pub trivial_length_penalty: f64,
    pub substantial_segment_chars: usize,
    pub trivial_segment_chars: usize,
    pub coherence_min_chars: usize,
    /// Quality must strictly exceed this for recovery
    pub recovery_threshold: f64,
    /// Indicators required for recovery (1-3)
    pub min_recovery_indicators: usize,
    /// Share of non-blank lines forming the tail, in (0, 1]
    pub tail_fraction: f64,
    pub min_tail_lines: usize,
    pub min_tail_chars: usize,
}

impl Default for SegmentCalibration {
    fn default() -> Self {
        Self {
            base_quality: segment::BASE_QUALITY,
            structure_bonus: segment::STRUCTURE_BONUS,
            coherence_bonus: segment::COHERENCE_BONUS,
            content_bonus: segment::CONTENT_BONUS,
            length_bonus_max: segment::LENGTH_BONUS_MAX,
            trivial_length_penalty: segment::TRIVIAL_LENGTH_PENALTY,
            substantial_segment_chars: segment::SUBSTANTIAL_SEGMENT_CHARS,
            trivial_segment_chars: segment::TRIVIAL_SEGMENT_CHARS,
            coherence_min_chars: segment::COHERENCE_MIN_CHARS,
            recovery_threshold: segment::RECOVERY_QUALITY_THRESHOLD,
            min_recovery_indicators: segment::MIN_RECOVERY_INDICATORS,
            tail_fraction: segment::TAIL_FRACTION,
            min_tail_lines: segment::MIN_TAIL_LINES,
            min_tail_chars: segment::MIN_TAIL_CHARS,
        }
    }
}

/// Hybrid scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringCalibration {
    /// Deducted from segment quality for recovered loops
    pub efficiency_penalty: f64,
    /// Lowest score a recovered loop can receive
    pub min_recovery_floor: f64,
    /// Highest score a pure cognitive failure keeps
    pub failure_score_cap: f64,
    /// Upper bound of every adjusted score
    pub max_score: f64,
}

impl Default for ScoringCalibration {
    fn default() -> Self {
        Self {
            efficiency_penalty: scoring::EFFICIENCY_PENALTY,
            min_recovery_floor: scoring::MIN_RECOVERY_FLOOR,
            failure_score_cap: scoring::FAILURE_SCORE_CAP,
            max_score: scoring::MAX_SCORE,
        }
    }
}
