//! Error macros for loopscore

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::LoopscoreError::invalid_value($context, $value))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::LoopscoreError::UsageError($msg.to_string()))
    };
}

/// Macro for creating config validation errors
#[macro_export]
macro_rules! bail_config {
    ($path:expr, $reason:expr) => {
        return Err($crate::error::LoopscoreError::invalid_config($path, $reason))
    };
}
