//! Loop-recovery classification
//!
//! Maps an upstream coherence-failure diagnostic plus the final-segment
//! analysis onto one of three outcomes. Only the literal `repetitive_loop`
//! failure type marks a loop; anything else is a clean response.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::segment::FinalSegmentAnalysis;

/// The one failure type the classifier acts on
pub const REPETITIVE_LOOP: &str = "repetitive_loop";

/// Failure type reported for responses that trail off unfinished
pub const INCOMPLETE_RESPONSE: &str = "incomplete_response";

/// Coherence diagnostic from an upstream base evaluator.
///
/// Deserializes permissively: missing or mistyped fields fall back to their
/// defaults (empty type, no segment, zero repetitions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceFailure {
    #[serde(deserialize_with = "lenient_string")]
    pub failure_type: String,
    #[serde(
        deserialize_with = "lenient_segment",
        skip_serializing_if = "Option::is_none"
    )]
    pub repeated_segment: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub repetitions: usize,
}

impl CoherenceFailure {
    pub fn new(failure_type: impl Into<String>) -> Self {
        Self {
            failure_type: failure_type.into(),
            ..Self::default()
        }
    }

    /// A repetitive loop with the fragment that repeated
    pub fn repetitive_loop(repeated_segment: impl Into<String>, repetitions: usize) -> Self {
        Self {
            failure_type: REPETITIVE_LOOP.to_string(),
            repeated_segment: Some(repeated_segment.into()),
            repetitions,
        }
    }

    pub fn is_repetitive_loop(&self) -> bool {
        self.failure_type == REPETITIVE_LOOP
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        _ => String::new(),
    })
}

fn lenient_segment<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0))
}

/// Outcome of loop-recovery classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopClassification {
    /// No loop flagged upstream
    CleanResponse,
    /// Looped, then delivered a strong final segment
    LoopWithRecovery,
    /// Looped and never recovered
    PureCognitiveFailure,
}

impl LoopClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopClassification::CleanResponse => "clean_response",
            LoopClassification::LoopWithRecovery => "loop_with_recovery",
            LoopClassification::PureCognitiveFailure => "pure_cognitive_failure",
        }
    }
}

impl fmt::Display for LoopClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a response from its coherence diagnostic and segment analysis
pub fn classify_loop_response(
    coherence_failure: Option<&CoherenceFailure>,
    segment: &FinalSegmentAnalysis,
) -> LoopClassification {
    let classification = match coherence_failure {
        Some(failure) if failure.is_repetitive_loop() => {
            if segment.recovery_detected {
                LoopClassification::LoopWithRecovery
            } else {
                LoopClassification::PureCognitiveFailure
            }
        }
        _ => LoopClassification::CleanResponse,
    };

    debug!(
        failure_type = coherence_failure.map(|f| f.failure_type.as_str()),
        recovery_detected = segment.recovery_detected,
        %classification,
        "loop_classification"
    );

    classification
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(recovery_detected: bool) -> FinalSegmentAnalysis {
        FinalSegmentAnalysis {
            quality_score: if recovery_detected { 95.0 } else { 35.0 },
            recovery_detected,
            ..FinalSegmentAnalysis::default()
        }
    }

    #[test]
    fn test_no_failure_is_clean() {
        assert_eq!(
            classify_loop_response(None, &segment(true)),
            LoopClassification::CleanResponse
        );
        assert_eq!(
            classify_loop_response(None, &segment(false)),
            LoopClassification::CleanResponse
        );
    }

    #[test]
    fn test_loop_with_recovery() {
        let failure = CoherenceFailure::new(REPETITIVE_LOOP);
        assert_eq!(
            classify_loop_response(Some(&failure), &segment(true)),
            LoopClassification::LoopWithRecovery
        );
    }

    #[test]
    fn test_loop_without_recovery_is_failure() {
        let failure = CoherenceFailure::repetitive_loop("Let me think", 12);
        assert_eq!(
            classify_loop_response(Some(&failure), &segment(false)),
            LoopClassification::PureCognitiveFailure
        );
    }

    #[test]
    fn test_other_failure_types_are_clean() {
        for failure_type in [INCOMPLETE_RESPONSE, "", "REPETITIVE_LOOP", "repetitive loop", "garbage"] {
            let failure = CoherenceFailure::new(failure_type);
            assert_eq!(
                classify_loop_response(Some(&failure), &segment(false)),
                LoopClassification::CleanResponse,
                "failure_type {failure_type:?}"
            );
        }
    }

    #[test]
    fn test_malformed_diagnostics_deserialize_to_defaults() {
        for json in [
            r#"{}"#,
            r#"{"failure_type": null}"#,
            r#"{"failure_type": 42}"#,
            r#"{"failure_type": ["repetitive_loop"]}"#,
            r#"{"repetitions": 3}"#,
        ] {
            let failure: CoherenceFailure = serde_json::from_str(json).unwrap();
            assert!(!failure.is_repetitive_loop(), "{json}");
        }
    }

    #[test]
    fn test_mistyped_loop_details_fall_back_to_defaults() {
        for json in [
            r#"{"failure_type": "repetitive_loop", "repetitions": "many"}"#,
            r#"{"failure_type": "repetitive_loop", "repetitions": -1}"#,
            r#"{"failure_type": "repetitive_loop", "repetitions": 2.5}"#,
            r#"{"failure_type": "repetitive_loop", "repeated_segment": 7}"#,
            r#"{"failure_type": "repetitive_loop", "repeated_segment": {"text": "x"}}"#,
        ] {
            let failure: CoherenceFailure = serde_json::from_str(json).unwrap();
            assert!(failure.is_repetitive_loop(), "{json}");
            assert_eq!(failure.repetitions, 0, "{json}");
            assert!(failure.repeated_segment.is_none(), "{json}");
        }

        let failure: CoherenceFailure = serde_json::from_str(
            r#"{"failure_type": "repetitive_loop", "repeated_segment": "again", "repetitions": 5}"#,
        )
        .unwrap();
        assert_eq!(failure, CoherenceFailure::repetitive_loop("again", 5));
    }

    #[test]
    fn test_missing_recovery_flag_means_failure() {
        let failure: CoherenceFailure =
            serde_json::from_str(r#"{"failure_type": "repetitive_loop"}"#).unwrap();
        let analysis: FinalSegmentAnalysis =
            serde_json::from_str(r#"{"quality_score": 99.0}"#).unwrap();

        assert_eq!(
            classify_loop_response(Some(&failure), &analysis),
            LoopClassification::PureCognitiveFailure
        );
    }

    #[test]
    fn test_classification_serializes_snake_case() {
        let json = serde_json::to_string(&LoopClassification::PureCognitiveFailure).unwrap();
        assert_eq!(json, r#""pure_cognitive_failure""#);
        assert_eq!(LoopClassification::LoopWithRecovery.to_string(), "loop_with_recovery");
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let failure = CoherenceFailure::repetitive_loop("Wait", 5);
        let analysis = segment(true);
        let (before_failure, before_analysis) = (failure.clone(), analysis.clone());

        classify_loop_response(Some(&failure), &analysis);

        assert_eq!(failure, before_failure);
        assert_eq!(analysis, before_analysis);
    }
}
