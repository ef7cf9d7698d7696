//! `loopscore evaluate` command

use std::path::Path;

use loopscore_core::cases::TestCase;
use loopscore_core::config::CalibrationConfig;
use loopscore_core::error::Result;
use loopscore_core::format::OutputFormat;
use loopscore_core::{bail_invalid, CoherenceFailure, EvaluationResult, Evaluator};

use super::input::{read_response, yes_no};
use crate::cli::Cli;

/// Execute the evaluate command
pub fn execute(
    cli: &Cli,
    config: &CalibrationConfig,
    file: Option<&Path>,
    name: &str,
    coherence_failure: Option<&str>,
    baseline_score: Option<f64>,
) -> Result<()> {
    if let Some(failure_type) = coherence_failure {
        if failure_type.trim().is_empty() {
            bail_invalid!("coherence failure type", "(empty)");
        }
    }

    let response = read_response(file)?;

    let mut case = TestCase::new(name, response);
    case.coherence_failure = coherence_failure.map(CoherenceFailure::new);
    case.baseline_score = baseline_score;

    let result = Evaluator::with_calibration(config).evaluate_case(&case);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Human => {
            if cli.quiet {
                println!("{:.1}", result.overall_score);
            } else {
                print_human(&result);
            }
        }
    }

    Ok(())
}

fn print_human(result: &EvaluationResult) {
    println!("{}", result.test_name);
    println!(
        "  score: {:.1} ({}), baseline {:.1}",
        result.overall_score, result.tier, result.baseline_score
    );
    println!("  classification: {}", result.classification);
    if let Some(failure) = &result.coherence_failure {
        match &failure.repeated_segment {
            Some(segment) => println!(
                "  coherence failure: {} ({}x \"{}\")",
                failure.failure_type, failure.repetitions, segment
            ),
            None => println!("  coherence failure: {}", failure.failure_type),
        }
    }

    let segment = &result.segment;
    println!(
        "  final segment: quality {:.1}, structure {}, coherent {}, content {}, recovery {}",
        segment.quality_score,
        yes_no(segment.has_structure),
        yes_no(segment.is_coherent),
        yes_no(segment.delivers_content),
        yes_no(segment.recovery_detected),
    );
    println!(
        "  entropy: quality ratio {:.3}, repetition {:.3}",
        result.entropy.entropy_quality_ratio, result.entropy.patterns.repetition_ratio
    );
    println!(
        "  consistency: {:.3}{}",
        result.consistency.consistency_score,
        if result.consistency.incomplete {
            " (incomplete)"
        } else {
            ""
        }
    );
}
