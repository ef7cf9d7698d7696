//! End-to-end evaluation pipeline
//!
//! baseline -> final-segment analysis -> loop classification -> hybrid
//! scoring -> tier. Each evaluation is independent; an [`Evaluator`] holds
//! no per-call state.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::baseline::{BaselineEvaluator, HeuristicBaseline, TextSignals};
use crate::cases::TestCase;
use crate::classify::{classify_loop_response, CoherenceFailure, LoopClassification};
use crate::config::CalibrationConfig;
use crate::consistency::ConsistencyReport;
use crate::entropy::EntropyProfile;
use crate::scoring::{HybridScorer, ScoreMetrics, ScoreTier};
use crate::segment::{FinalSegmentAnalysis, PriorResult, SegmentAnalyzer};
use crate::trace_time;

/// Everything known about one evaluated response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub test_name: String,
    /// Score before loop-recovery scoring
    pub baseline_score: f64,
    /// Final calibrated score, 0-100
    pub overall_score: f64,
    pub tier: ScoreTier,
    pub classification: LoopClassification,
    pub segment: FinalSegmentAnalysis,
    pub coherence_failure: Option<CoherenceFailure>,
    pub entropy: EntropyProfile,
    pub consistency: ConsistencyReport,
}

/// Counts and mean score over a batch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub clean_responses: usize,
    pub loops_with_recovery: usize,
    pub pure_cognitive_failures: usize,
    pub mean_score: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[EvaluationResult]) -> Self {
        let mut summary = BatchSummary {
            total: results.len(),
            ..BatchSummary::default()
        };

        for result in results {
            match result.classification {
                LoopClassification::CleanResponse => summary.clean_responses += 1,
                LoopClassification::LoopWithRecovery => summary.loops_with_recovery += 1,
                LoopClassification::PureCognitiveFailure => summary.pure_cognitive_failures += 1,
            }
        }

        if !results.is_empty() {
            let total: f64 = results.iter().map(|r| r.overall_score).sum();
            summary.mean_score = total / results.len() as f64;
        }

        summary
    }
}

/// Results of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub results: Vec<EvaluationResult>,
    pub summary: BatchSummary,
}

/// Runs the full evaluation pipeline
pub struct Evaluator {
    baseline: Box<dyn BaselineEvaluator + Send + Sync>,
    analyzer: SegmentAnalyzer,
    scorer: HybridScorer,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(HeuristicBaseline, &CalibrationConfig::default())
    }
}

impl Evaluator {
    pub fn new(
        baseline: impl BaselineEvaluator + Send + Sync + 'static,
        calibration: &CalibrationConfig,
    ) -> Self {
        Self {
            baseline: Box::new(baseline),
            analyzer: SegmentAnalyzer::new(calibration.segment.clone()),
            scorer: HybridScorer::new(calibration.scoring.clone()),
        }
    }

    /// Heuristic baseline with the given calibration
    pub fn with_calibration(calibration: &CalibrationConfig) -> Self {
        Self::new(HeuristicBaseline, calibration)
    }

    pub fn analyzer(&self) -> &SegmentAnalyzer {
        &self.analyzer
    }

    /// Evaluate a response with no upstream overrides
    pub fn evaluate(&self, name: &str, text: &str) -> EvaluationResult {
        self.evaluate_case(&TestCase::new(name, text))
    }

    /// Evaluate a case; its coherence failure and baseline score, when
    /// present, replace what the baseline evaluator reports
    #[tracing::instrument(name = "evaluate", skip(self, case), fields(test_name = %case.name))]
    pub fn evaluate_case(&self, case: &TestCase) -> EvaluationResult {
        let start = Instant::now();
        let text = case.response.as_str();

        let signals = TextSignals::analyze(text);
        let baseline = self.baseline.evaluate_with_signals(text, &signals);
        let coherence_failure = case
            .coherence_failure
            .clone()
            .or(baseline.coherence_failure);
        let baseline_score = ScoreMetrics::new(case.baseline_score.unwrap_or(baseline.overall_score));

        let prior = PriorResult {
            overall_score: baseline_score.overall_score,
        };
        let segment = self.analyzer.analyze(text, Some(&prior));
        let classification = classify_loop_response(coherence_failure.as_ref(), &segment);

        let mut metrics = baseline_score;
        self.scorer.apply(&mut metrics, classification, &segment);
        let tier = ScoreTier::from_score(metrics.overall_score);

        debug!(
            baseline_score = baseline_score.overall_score,
            overall_score = metrics.overall_score,
            %classification,
            %tier,
            "evaluation complete"
        );
        trace_time!(start, "evaluate_case");

        EvaluationResult {
            test_name: case.name.clone(),
            baseline_score: baseline_score.overall_score,
            overall_score: metrics.overall_score,
            tier,
            classification,
            segment,
            coherence_failure,
            entropy: signals.entropy,
            consistency: signals.consistency,
        }
    }

    /// Evaluate every case and summarize
    pub fn evaluate_batch(&self, cases: &[TestCase]) -> BatchReport {
        let start = Instant::now();
        let results: Vec<EvaluationResult> =
            cases.iter().map(|case| self.evaluate_case(case)).collect();
        let summary = BatchSummary::from_results(&results);
        trace_time!(start, "evaluate_batch", cases = cases.len());

        BatchReport {
            generated_at: Utc::now(),
            results,
            summary,
        }
    }
}
