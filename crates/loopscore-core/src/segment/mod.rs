//! Final-segment quality analysis
//!
//! Inspects the tail of a response as a proxy for what the model finally
//! delivered, scoring its structure, coherence and content delivery. A
//! response that looped earlier but ends in a strong tail is flagged as
//! having recovered.

pub mod markers;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SegmentCalibration;
use crate::text;

/// Starting quality before indicator bonuses
pub const BASE_QUALITY: f64 = 40.0;
/// Bonus for structural formatting in the tail
pub const STRUCTURE_BONUS: f64 = 25.0;
/// Bonus for coherence/closure markers in the tail
pub const COHERENCE_BONUS: f64 = 20.0;
/// Bonus for concrete delivered content in the tail
pub const CONTENT_BONUS: f64 = 15.0;
/// Largest length bonus, reached at `SUBSTANTIAL_SEGMENT_CHARS`
pub const LENGTH_BONUS_MAX: f64 = 10.0;
/// Deduction for trivially short tails
pub const TRIVIAL_LENGTH_PENALTY: f64 = 10.0;
/// Tail length earning the full length bonus
pub const SUBSTANTIAL_SEGMENT_CHARS: usize = 200;
/// Tails shorter than this are penalized
pub const TRIVIAL_SEGMENT_CHARS: usize = 10;
/// Tails shorter than this are never coherent
pub const COHERENCE_MIN_CHARS: usize = 30;
/// Quality must strictly exceed this to count as recovery
pub const RECOVERY_QUALITY_THRESHOLD: f64 = 70.0;
/// Indicators (of structure, coherence, content) required for recovery
pub const MIN_RECOVERY_INDICATORS: usize = 2;
/// Share of non-blank lines forming the final segment
pub const TAIL_FRACTION: f64 = 0.25;
/// Texts with fewer non-blank lines are analyzed whole
pub const MIN_TAIL_LINES: usize = 4;
/// Texts with fewer characters are analyzed whole
pub const MIN_TAIL_CHARS: usize = 40;
/// Lower bound of every quality score
pub const MIN_QUALITY: f64 = 0.0;
/// Upper bound of every quality score
pub const MAX_QUALITY: f64 = 100.0;

/// Quality analysis of a response's final segment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalSegmentAnalysis {
    /// Tail quality, 0-100
    pub quality_score: f64,
    /// Structural formatting markers present
    pub has_structure: bool,
    /// Closure markers present and tail long enough
    pub is_coherent: bool,
    /// Concrete deliverable present
    pub delivers_content: bool,
    /// Quality above threshold with enough indicators
    pub recovery_detected: bool,
}

impl FinalSegmentAnalysis {
    /// Number of true indicators among structure, coherence and content
    pub fn indicator_count(&self) -> usize {
        [self.has_structure, self.is_coherent, self.delivers_content]
            .into_iter()
            .filter(|flag| *flag)
            .count()
    }
}

/// Score hint from an upstream evaluation of the same response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorResult {
    pub overall_score: f64,
}

/// Segment analyzer bound to a calibration
#[derive(Debug, Clone, Default)]
pub struct SegmentAnalyzer {
    calibration: SegmentCalibration,
}

impl SegmentAnalyzer {
    pub fn new(calibration: SegmentCalibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &SegmentCalibration {
        &self.calibration
    }

    /// Analyze the final segment of `text`.
    ///
    /// The prior result is only traced; it never changes the analysis.
    pub fn analyze(&self, text: &str, prior: Option<&PriorResult>) -> FinalSegmentAnalysis {
        let segment = self.extract_final_segment(text);

        let has_structure = check_structured_format(&segment);
        let is_coherent = self.check_coherence(&segment);
        let delivers_content = check_content_delivery(&segment);
        let quality_score =
            self.segment_quality(&segment, has_structure, is_coherent, delivers_content);

        let mut analysis = FinalSegmentAnalysis {
            quality_score,
            has_structure,
            is_coherent,
            delivers_content,
            recovery_detected: false,
        };
        analysis.recovery_detected = self.recovery_detected(&analysis);

        debug!(
            segment_chars = text::char_len(&segment),
            prior_score = prior.map(|p| p.overall_score),
            quality_score,
            has_structure,
            is_coherent,
            delivers_content,
            recovery_detected = analysis.recovery_detected,
            "final_segment_analysis"
        );

        analysis
    }

    /// Extract the trailing portion of `text`.
    ///
    /// Blank lines are dropped and the rest trimmed. Short texts pass through
    /// whole; longer ones keep the last `tail_fraction` of their lines
    /// (rounded up, at least one).
    pub fn extract_final_segment(&self, text: &str) -> String {
        let lines = text::non_blank_lines(text);
        let whole = lines.join("\n");

        if lines.len() < self.calibration.min_tail_lines
            || text::char_len(&whole) < self.calibration.min_tail_chars
        {
            return whole;
        }

        let take = ((lines.len() as f64) * self.calibration.tail_fraction).ceil() as usize;
        let take = take.clamp(1, lines.len());
        lines[lines.len() - take..].join("\n")
    }

    /// Closure markers present in a long-enough tail not dominated by filler
    pub fn check_coherence(&self, segment: &str) -> bool {
        if text::char_len(segment.trim()) < self.calibration.coherence_min_chars {
            return false;
        }

        let closures = markers::closure_marker_count(segment);
        if closures == 0 {
            return false;
        }

        !markers::hedging_dominates(markers::hedge_marker_count(segment), closures)
    }

    /// Quality of a segment given its indicator flags, clamped to 0-100
    pub fn segment_quality(
        &self,
        segment: &str,
        has_structure: bool,
        is_coherent: bool,
        delivers_content: bool,
    ) -> f64 {
        let cal = &self.calibration;
        let mut score = cal.base_quality;

        if has_structure {
            score += cal.structure_bonus;
        }
        if is_coherent {
            score += cal.coherence_bonus;
        }
        if delivers_content {
            score += cal.content_bonus;
        }

        score += self.length_adjustment(text::char_len(segment.trim()));

        score.clamp(MIN_QUALITY, MAX_QUALITY)
    }

    fn length_adjustment(&self, len: usize) -> f64 {
        let cal = &self.calibration;
        if len < cal.trivial_segment_chars {
            return -cal.trivial_length_penalty;
        }
        if cal.substantial_segment_chars == 0 {
            return cal.length_bonus_max;
        }
        let substance = (len as f64 / cal.substantial_segment_chars as f64).min(1.0);
        cal.length_bonus_max * substance
    }

    /// Recovery needs quality strictly above threshold and enough indicators
    pub fn recovery_detected(&self, analysis: &FinalSegmentAnalysis) -> bool {
        analysis.quality_score > self.calibration.recovery_threshold
            && analysis.indicator_count() >= self.calibration.min_recovery_indicators
    }
}

/// Structural formatting markers present in the segment
pub fn check_structured_format(segment: &str) -> bool {
    markers::has_structure_markers(segment)
}

/// Concrete deliverable content present in the segment
pub fn check_content_delivery(segment: &str) -> bool {
    markers::has_delivery_markers(segment)
}

/// Analyze the final segment of `text` with the default calibration
pub fn analyze_final_segment(text: &str, prior: Option<&PriorResult>) -> FinalSegmentAnalysis {
    SegmentAnalyzer::default().analyze(text, prior)
}
