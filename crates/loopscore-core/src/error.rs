//! Error types and exit codes for loopscore
//!
//! The scoring core never fails on text input; errors only arise at the
//! edges (configuration, case files, CLI input).
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (invalid config or case file)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - invalid config or case file (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur at the edges of the evaluation pipeline
#[derive(Error, Debug)]
pub enum LoopscoreError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data errors (exit code 3)
    #[error("invalid config {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("invalid test cases in {path:?}: {reason}")]
    InvalidCases { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl LoopscoreError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        LoopscoreError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        LoopscoreError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a configuration file that failed to parse or validate
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        LoopscoreError::InvalidConfig {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for a case file that failed to parse
    pub fn invalid_cases(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        LoopscoreError::InvalidCases {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        LoopscoreError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LoopscoreError::UnknownFormat(_)
            | LoopscoreError::UsageError(_)
            | LoopscoreError::InvalidValue { .. }
            | LoopscoreError::Unsupported { .. } => ExitCode::Usage,

            LoopscoreError::InvalidConfig { .. } | LoopscoreError::InvalidCases { .. } => {
                ExitCode::Data
            }

            LoopscoreError::Io(_)
            | LoopscoreError::Json(_)
            | LoopscoreError::FailedOperationWithTarget { .. }
            | LoopscoreError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            LoopscoreError::UnknownFormat(_) => "unknown_format",
            LoopscoreError::UsageError(_) => "usage_error",
            LoopscoreError::InvalidValue { .. } => "invalid_value",
            LoopscoreError::Unsupported { .. } => "unsupported",
            LoopscoreError::InvalidConfig { .. } => "invalid_config",
            LoopscoreError::InvalidCases { .. } => "invalid_cases",
            LoopscoreError::Io(_) => "io_error",
            LoopscoreError::Json(_) => "json_error",
            LoopscoreError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            LoopscoreError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for loopscore operations
pub type Result<T> = std::result::Result<T, LoopscoreError>;
