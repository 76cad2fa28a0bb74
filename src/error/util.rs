//! Utility functions for error handling
//!
//! This module provides helpers that turn filesystem failures into the
//! service's error taxonomy with useful context attached.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, RiskServiceError};

/// Read a model artifact to string with rich error information
///
/// A path that does not exist (or is not a file) means the artifact is
/// unavailable; every other failure is reported as a scoring error.
///
/// # Arguments
/// * `path` - The path to the artifact
/// * `purpose` - Why the file is being read (for error context)
pub fn read_artifact(path: &Path, purpose: &str) -> Result<String> {
    if !path.is_file() {
        return Err(RiskServiceError::ModelUnavailable {
            path: path.to_path_buf(),
        });
    }

    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::NotFound => {
                    // Deleted between the check and the read
                    return Err(RiskServiceError::ModelUnavailable {
                        path: path.to_path_buf(),
                    });
                }
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check file permissions".to_string()
                }
                io::ErrorKind::InvalidData => {
                    "File contains invalid UTF-8 data - cannot read as text".to_string()
                }
                _ => format!("Failed to read file for: {purpose}"),
            };

            Err(RiskServiceError::Scoring(format!(
                "{context} ({}): {e}",
                path.display()
            )))
        }
    }
}
