//! `loopscore analyze` command

use std::path::Path;

use loopscore_core::config::CalibrationConfig;
use loopscore_core::error::Result;
use loopscore_core::format::OutputFormat;
use loopscore_core::segment::SegmentAnalyzer;

use super::input::{read_response, yes_no};
use crate::cli::Cli;

/// Execute the analyze command
pub fn execute(cli: &Cli, config: &CalibrationConfig, file: Option<&Path>) -> Result<()> {
    let response = read_response(file)?;

    let analyzer = SegmentAnalyzer::new(config.segment.clone());
    let final_segment = analyzer.extract_final_segment(&response);
    let analysis = analyzer.analyze(&response, None);

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "final_segment": final_segment,
                "analysis": analysis,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("quality: {:.1}", analysis.quality_score);
            println!("structure: {}", yes_no(analysis.has_structure));
            println!("coherent: {}", yes_no(analysis.is_coherent));
            println!("content: {}", yes_no(analysis.delivers_content));
            println!("recovery: {}", yes_no(analysis.recovery_detected));
            if !cli.quiet && !final_segment.is_empty() {
                println!();
                println!("{}", final_segment);
            }
        }
    }

    Ok(())
}
