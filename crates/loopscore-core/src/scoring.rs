//! Hybrid loop-recovery scoring
//!
//! Applies the per-classification transform to an overall score:
//! clean responses pass through, pure failures are capped, and recovered
//! loops are re-scored from their final segment minus an efficiency penalty.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::LoopClassification;
use crate::config::ScoringCalibration;
use crate::segment::FinalSegmentAnalysis;

/// Deducted from segment quality when a loop recovered
pub const EFFICIENCY_PENALTY: f64 = 12.0;
/// Recovered loops never score below this
pub const MIN_RECOVERY_FLOOR: f64 = 15.0;
/// Pure cognitive failures never keep more than this
pub const FAILURE_SCORE_CAP: f64 = 10.0;
/// Upper bound of every score
pub const MAX_SCORE: f64 = 100.0;
/// Lower bound of every score
pub const MIN_SCORE: f64 = 0.0;

/// The score field the hybrid stage rewrites
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreMetrics {
    pub overall_score: f64,
}

impl ScoreMetrics {
    /// Metrics with the score clamped to 0-100; NaN reads as 0
    pub fn new(overall_score: f64) -> Self {
        let overall_score = if overall_score.is_nan() {
            MIN_SCORE
        } else {
            overall_score.clamp(MIN_SCORE, MAX_SCORE)
        };
        Self { overall_score }
    }
}

/// Scorer bound to a calibration
#[derive(Debug, Clone, Default)]
pub struct HybridScorer {
    calibration: ScoringCalibration,
}

impl HybridScorer {
    pub fn new(calibration: ScoringCalibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &ScoringCalibration {
        &self.calibration
    }

    /// Score after the hybrid transform; the prior is ignored for recovered loops
    pub fn adjusted_score(
        &self,
        prior: f64,
        classification: LoopClassification,
        segment: &FinalSegmentAnalysis,
    ) -> f64 {
        let cal = &self.calibration;
        match classification {
            LoopClassification::CleanResponse => prior,
            LoopClassification::PureCognitiveFailure => prior.min(cal.failure_score_cap),
            LoopClassification::LoopWithRecovery => {
                // f64::max drops NaN, so an unmeasured segment lands on the floor
                (segment.quality_score - cal.efficiency_penalty)
                    .max(cal.min_recovery_floor)
                    .min(cal.max_score)
            }
        }
    }

    /// Rewrite `metrics.overall_score` in place
    pub fn apply(
        &self,
        metrics: &mut ScoreMetrics,
        classification: LoopClassification,
        segment: &FinalSegmentAnalysis,
    ) {
        let before = metrics.overall_score;
        metrics.overall_score = self.adjusted_score(before, classification, segment);

        debug!(
            %classification,
            before,
            after = metrics.overall_score,
            segment_quality = segment.quality_score,
            "hybrid_scoring"
        );
    }
}

/// Apply hybrid scoring with the default calibration
pub fn apply_loop_recovery_scoring(
    metrics: &mut ScoreMetrics,
    classification: LoopClassification,
    segment: &FinalSegmentAnalysis,
) {
    HybridScorer::default().apply(metrics, classification, segment);
}

/// Pure form of [`apply_loop_recovery_scoring`]
pub fn hybrid_score(
    prior: f64,
    classification: LoopClassification,
    segment: &FinalSegmentAnalysis,
) -> f64 {
    HybridScorer::default().adjusted_score(prior, classification, segment)
}

/// Coarse grade of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ScoreTier::Excellent
        } else if score >= 70.0 {
            ScoreTier::Good
        } else if score >= 50.0 {
            ScoreTier::Acceptable
        } else {
            ScoreTier::Poor
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTier::Excellent => write!(f, "Excellent"),
            ScoreTier::Good => write!(f, "Good"),
            ScoreTier::Acceptable => write!(f, "Acceptable"),
            ScoreTier::Poor => write!(f, "Poor"),
        }
    }
}
