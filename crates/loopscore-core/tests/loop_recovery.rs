//! End-to-end loop-recovery scenarios through the public API.

use loopscore_core::baseline::StaticBaseline;
use loopscore_core::cases::TestCase;
use loopscore_core::classify::REPETITIVE_LOOP;
use loopscore_core::config::CalibrationConfig;
use loopscore_core::segment::SegmentAnalyzer;
use loopscore_core::{
    analyze_final_segment, apply_loop_recovery_scoring, classify_loop_response, CoherenceFailure,
    Evaluator, FinalSegmentAnalysis, LoopClassification, ScoreMetrics,
};

const META_LOOP: &str = "Let me think about this...
Actually, I'm not sure...
Maybe I should reconsider...
Wait, let me try again...
Let me think about this...
Actually, I'm not sure...
Maybe I should reconsider...
Wait, let me try again...";

const STRUCTURED_RECOVERY: &str = "Let me think about this...
Let me think about this...
Let me think about this...
Let me think about this...
Let me think about this...
Let me think about this...
Let me think about this...
Let me think about this...
Let me think about this...
## Final Answer
Therefore, the translation is complete.
> \"Ẹ kú àárọ̀\" translates to \"Good morning\".";

fn loop_failure() -> CoherenceFailure {
    CoherenceFailure::new(REPETITIVE_LOOP)
}

#[test]
fn scenario_no_failure_keeps_score() {
    let segment = analyze_final_segment(STRUCTURED_RECOVERY, None);
    let classification = classify_loop_response(None, &segment);
    assert_eq!(classification, LoopClassification::CleanResponse);

    let mut metrics = ScoreMetrics::new(75.0);
    apply_loop_recovery_scoring(&mut metrics, classification, &segment);
    assert_eq!(metrics.overall_score, 75.0);
}

#[test]
fn scenario_meta_loop_is_capped() {
    let segment = analyze_final_segment(META_LOOP, None);
    assert!(!segment.recovery_detected);

    let classification = classify_loop_response(Some(&loop_failure()), &segment);
    assert_eq!(classification, LoopClassification::PureCognitiveFailure);

    let mut metrics = ScoreMetrics::new(95.0);
    apply_loop_recovery_scoring(&mut metrics, classification, &segment);
    assert_eq!(metrics.overall_score, 10.0);
}

#[test]
fn scenario_structured_recovery_scores_88() {
    let segment = analyze_final_segment(STRUCTURED_RECOVERY, None);
    assert!(segment.has_structure && segment.is_coherent && segment.delivers_content);
    assert_eq!(segment.quality_score, 100.0);
    assert!(segment.recovery_detected);

    let classification = classify_loop_response(Some(&loop_failure()), &segment);
    assert_eq!(classification, LoopClassification::LoopWithRecovery);

    for prior in [0.0, 40.0, 100.0] {
        let mut metrics = ScoreMetrics::new(prior);
        apply_loop_recovery_scoring(&mut metrics, classification, &segment);
        assert_eq!(metrics.overall_score, 88.0);
    }
}

#[test]
fn scenario_low_quality_recovery_hits_floor() {
    let segment = FinalSegmentAnalysis {
        quality_score: 25.0,
        recovery_detected: true,
        ..FinalSegmentAnalysis::default()
    };
    let classification = classify_loop_response(Some(&loop_failure()), &segment);

    let mut metrics = ScoreMetrics::new(60.0);
    apply_loop_recovery_scoring(&mut metrics, classification, &segment);
    assert_eq!(metrics.overall_score, 15.0);
}

#[test]
fn scenario_two_indicators_recover() {
    let analyzer = SegmentAnalyzer::default();
    let segment = FinalSegmentAnalysis {
        quality_score: 95.0,
        has_structure: false,
        is_coherent: true,
        delivers_content: true,
        recovery_detected: false,
    };
    assert!(analyzer.recovery_detected(&segment));
}

#[test]
fn scenario_single_indicator_does_not_recover() {
    let analyzer = SegmentAnalyzer::default();
    let mut segment = FinalSegmentAnalysis {
        quality_score: 72.0,
        has_structure: true,
        is_coherent: false,
        delivers_content: false,
        recovery_detected: false,
    };
    segment.recovery_detected = analyzer.recovery_detected(&segment);
    assert!(!segment.recovery_detected);

    assert_eq!(
        classify_loop_response(Some(&loop_failure()), &segment),
        LoopClassification::PureCognitiveFailure
    );
}

#[test]
fn pipeline_runs_upstream_overrides() {
    let evaluator = Evaluator::new(
        StaticBaseline::new(82.0, Some(loop_failure())),
        &CalibrationConfig::default(),
    );

    let recovered = evaluator.evaluate("recovered", STRUCTURED_RECOVERY);
    assert_eq!(recovered.classification, LoopClassification::LoopWithRecovery);
    assert_eq!(recovered.overall_score, 88.0);

    let failed = evaluator.evaluate("failed", META_LOOP);
    assert_eq!(failed.classification, LoopClassification::PureCognitiveFailure);
    assert_eq!(failed.overall_score, 10.0);

    let mut case = TestCase::new("clean", META_LOOP);
    case.coherence_failure = Some(CoherenceFailure::new("incomplete_response"));
    let clean = evaluator.evaluate_case(&case);
    assert_eq!(clean.classification, LoopClassification::CleanResponse);
    assert_eq!(clean.overall_score, 82.0);
}

#[test]
fn default_pipeline_flags_meta_loop_on_its_own() {
    let result = Evaluator::default().evaluate("meta", META_LOOP);
    assert!(result.coherence_failure.unwrap().is_repetitive_loop());
    assert_eq!(result.classification, LoopClassification::PureCognitiveFailure);
    assert!(result.overall_score <= 10.0);
}
