//! `loopscore config` command

use loopscore_core::config::{CalibrationConfig, ConfigSource};
use loopscore_core::error::Result;
use loopscore_core::format::OutputFormat;

use crate::cli::Cli;

/// Print the effective calibration and where it came from
pub fn execute(cli: &Cli, config: &CalibrationConfig, source: &ConfigSource) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": source.to_string(),
                "config": config,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!("# source: {}", source);
            }
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
