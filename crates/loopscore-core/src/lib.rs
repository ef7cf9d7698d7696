//! Loopscore Core Library
//!
//! Scoring core for LLM response evaluation: final-segment quality analysis,
//! loop-recovery classification, hybrid score calibration, and the entropy and
//! consistency signals a full evaluator blends around them.

pub mod baseline;
pub mod cases;
pub mod classify;
pub mod config;
pub mod consistency;
pub mod entropy;
pub mod error;
pub mod format;
pub mod logging;
pub mod pipeline;
pub mod scoring;
pub mod segment;
pub mod text;

pub use classify::{classify_loop_response, CoherenceFailure, LoopClassification};
pub use pipeline::{EvaluationResult, Evaluator};
pub use scoring::{apply_loop_recovery_scoring, ScoreMetrics, ScoreTier};
pub use segment::{analyze_final_segment, FinalSegmentAnalysis, PriorResult};
