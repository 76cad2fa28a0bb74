//! Logging utilities
//!
//! This module provides standardized log lines for pipeline stages.

pub mod log;

// Re-export commonly used functions for convenience
pub use self::log::{log_stage_complete, log_stage_failure, log_stage_start};
