//! CLI argument parsing for loopscore
//!
//! Global flags: --format, --config, --quiet, --verbose, --log-level, --log-json

pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use loopscore_core::format::OutputFormat;
use parse::{parse_output_format, parse_score};

/// Loopscore - loop-recovery aware scoring for LLM responses
#[derive(Parser, Debug)]
#[command(name = "loopscore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human or json)
    #[arg(long, global = true, default_value = "human", value_parser = parse_output_format)]
    pub format: OutputFormat,

    /// Calibration file (TOML)
    #[arg(long, global = true, env = "LOOPSCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log debug detail to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace) or a filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a response through the full pipeline
    Evaluate {
        /// Response file (stdin when absent or `-`)
        file: Option<PathBuf>,

        /// Name reported for the response
        #[arg(long, default_value = "response")]
        name: String,

        /// Upstream coherence failure type (e.g. repetitive_loop)
        #[arg(long)]
        coherence_failure: Option<String>,

        /// Upstream baseline score (0-100)
        #[arg(long, value_parser = parse_score)]
        baseline_score: Option<f64>,
    },

    /// Analyze the final segment of a response
    Analyze {
        /// Response file (stdin when absent or `-`)
        file: Option<PathBuf>,
    },

    /// Show the entropy profile of a response
    Entropy {
        /// Response file (stdin when absent or `-`)
        file: Option<PathBuf>,
    },

    /// Evaluate every case in a JSON or YAML case file
    Batch {
        /// Case file (.json, .yaml, .yml)
        cases: PathBuf,
    },

    /// Print the effective calibration
    Config,
}
