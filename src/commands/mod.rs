//! Command implementations for loopscore

pub mod analyze;
pub mod batch;
pub mod config;
pub mod dispatch;
pub mod entropy;
pub mod evaluate;
pub mod input;
