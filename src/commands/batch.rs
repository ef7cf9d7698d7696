//! `loopscore batch` command

use std::path::Path;
use std::time::Instant;

use loopscore_core::cases::load_test_cases;
use loopscore_core::config::CalibrationConfig;
use loopscore_core::error::Result;
use loopscore_core::format::OutputFormat;
use loopscore_core::{trace_time, Evaluator};

use crate::cli::Cli;

/// Execute the batch command
pub fn execute(cli: &Cli, config: &CalibrationConfig, cases_path: &Path) -> Result<()> {
    let start = Instant::now();
    let cases = load_test_cases(cases_path)?;
    trace_time!(start, "load_cases", count = cases.len());

    let report = Evaluator::with_calibration(config).evaluate_batch(&cases);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                for result in &report.results {
                    println!(
                        "{:<24} {:<24} {:>6.1}  {}",
                        result.test_name,
                        result.classification.as_str(),
                        result.overall_score,
                        result.tier
                    );
                }
                println!();
            }

            let summary = &report.summary;
            println!(
                "{} cases: {} clean, {} recovered, {} failed; mean score {:.1}",
                summary.total,
                summary.clean_responses,
                summary.loops_with_recovery,
                summary.pure_cognitive_failures,
                summary.mean_score
            );
        }
    }

    Ok(())
}
