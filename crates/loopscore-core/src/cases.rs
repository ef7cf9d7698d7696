//! Test-case files for batch evaluation
//!
//! A case file is a JSON or YAML list of cases. Each case carries the
//! response text and, optionally, the coherence diagnostic and baseline score
//! an upstream evaluator already assigned.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::CoherenceFailure;
use crate::error::{LoopscoreError, Result};

/// A single response to evaluate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coherence_failure: Option<CoherenceFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_score: Option<f64>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: response.into(),
            coherence_failure: None,
            baseline_score: None,
        }
    }
}

/// Load cases from a `.json`, `.yaml` or `.yml` file
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !matches!(extension.as_str(), "json" | "yaml" | "yml") {
        return Err(LoopscoreError::unsupported(
            "case file extension",
            if extension.is_empty() { "(none)" } else { extension.as_str() },
            "json, yaml, yml",
        ));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| LoopscoreError::io_operation("read cases", path.display(), e))?;

    let cases: Vec<TestCase> = if extension == "json" {
        serde_json::from_str(&content).map_err(|e| LoopscoreError::invalid_cases(path, e))?
    } else {
        serde_yaml::from_str(&content).map_err(|e| LoopscoreError::invalid_cases(path, e))?
    };

    debug!(path = %path.display(), count = cases.len(), "loaded test cases");
    Ok(cases)
}
