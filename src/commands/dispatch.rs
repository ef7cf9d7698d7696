//! Command dispatch logic for loopscore
use std::env;
use std::path::PathBuf;
use std::time::Instant;

use loopscore_core::config::{CalibrationConfig, ConfigSource};
use loopscore_core::error::Result;
use loopscore_core::trace_time;

use crate::cli::{Cli, Commands};
use crate::commands;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    match &cli.command {
        None => handle_no_command(),

        Some(Commands::Evaluate {
            file,
            name,
            coherence_failure,
            baseline_score,
        }) => {
            let (config, _) = resolve_config(cli, start)?;
            commands::evaluate::execute(
                cli,
                &config,
                file.as_deref(),
                name,
                coherence_failure.as_deref(),
                *baseline_score,
            )
        }

        Some(Commands::Analyze { file }) => {
            let (config, _) = resolve_config(cli, start)?;
            commands::analyze::execute(cli, &config, file.as_deref())
        }

        Some(Commands::Entropy { file }) => commands::entropy::execute(cli, file.as_deref()),

        Some(Commands::Batch { cases }) => {
            let (config, _) = resolve_config(cli, start)?;
            commands::batch::execute(cli, &config, cases)
        }

        Some(Commands::Config) => {
            let (config, source) = resolve_config(cli, start)?;
            commands::config::execute(cli, &config, &source)
        }
    }
}

fn resolve_config(cli: &Cli, start: Instant) -> Result<(CalibrationConfig, ConfigSource)> {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let resolved = CalibrationConfig::discover(cli.config.as_deref(), &cwd)?;
    trace_time!(start, "resolve_config");
    tracing::debug!(source = %resolved.1, "calibration loaded");
    Ok(resolved)
}

fn handle_no_command() -> Result<()> {
    println!("loopscore {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Loop-recovery aware scoring for LLM responses.");
    println!();
    println!("Run `loopscore --help` for usage information.");
    Ok(())
}
