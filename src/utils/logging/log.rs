//! Logging utilities
//!
//! This module provides standardized logging functions for pipeline stages.
//! Every line carries the stage and the patient it concerns.

use std::fmt::Display;
use std::time::Duration;

/// Log a stage start with consistent format
///
/// # Arguments
/// * `stage` - The pipeline stage being entered
/// * `patient_id` - The patient the request is for
pub fn log_stage_start(stage: impl Display, patient_id: impl Display) {
    log::info!("[{stage}] started for patient {patient_id}");
}

/// Log a stage completion with consistent format
///
/// # Arguments
/// * `stage` - The pipeline stage that finished
/// * `patient_id` - The patient the request is for
/// * `elapsed` - Time spent in the stage
pub fn log_stage_complete(stage: impl Display, patient_id: impl Display, elapsed: Duration) {
    log::info!("[{stage}] completed for patient {patient_id} in {elapsed:?}");
}

/// Log a stage failure with consistent format
///
/// # Arguments
/// * `stage` - The pipeline stage that failed
/// * `patient_id` - The patient the request is for
/// * `error` - The error that aborted the stage
pub fn log_stage_failure(stage: impl Display, patient_id: impl Display, error: impl Display) {
    log::error!("[{stage}] failed for patient {patient_id}: {error}");
}
