//! Error handling for the risk prediction service.

pub mod util;

use std::fmt;
use std::path::PathBuf;

/// Clinical-records resource types the service reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Patient,
    Observation,
    Condition,
    MedicationStatement,
    RiskAssessment,
}

impl ResourceKind {
    /// Resource type name as used in clinical-records URLs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Observation => "Observation",
            Self::Condition => "Condition",
            Self::MedicationStatement => "MedicationStatement",
            Self::RiskAssessment => "RiskAssessment",
        }
    }

    /// Client-facing message used when a lookup of this resource fails
    #[must_use]
    pub const fn not_found_detail(self) -> &'static str {
        match self {
            Self::Patient => "Patient not found",
            Self::Observation => "Observations not found",
            Self::Condition => "Conditions not found",
            Self::MedicationStatement => "Medication status not found",
            Self::RiskAssessment => "Risk assessments not found",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specialized error type for the risk prediction pipeline
#[derive(Debug, thiserror::Error)]
pub enum RiskServiceError {
    /// An upstream clinical resource lookup failed
    #[error("{resource} lookup failed for patient {patient_id}: {reason}")]
    NotFound {
        resource: ResourceKind,
        patient_id: String,
        reason: String,
    },

    /// Malformed or missing demographic data
    #[error("Validation error: {0}")]
    Validation(String),

    /// The model artifact could not be located
    #[error("Model artifact not found at {}", path.display())]
    ModelUnavailable { path: PathBuf },

    /// Any other failure while producing a score
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Writing the assessment back to the clinical-records server failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RiskServiceError {
    /// Create a lookup failure for a resource
    pub fn not_found(
        resource: ResourceKind,
        patient_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource,
            patient_id: patient_id.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status code reported to the caller
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Short human-readable message reported to the caller
    #[must_use]
    pub const fn detail(&self) -> &'static str {
        match self {
            Self::NotFound { resource, .. } => resource.not_found_detail(),
            Self::ModelUnavailable { .. } => "Model file not found.",
            Self::Scoring(_) => "Error during prediction.",
            Self::Persistence(_) => "Error saving risk assessment",
            Self::Validation(_) | Self::Configuration(_) => "Error calculating risk",
        }
    }
}

/// Result type for risk service operations
pub type Result<T> = std::result::Result<T, RiskServiceError>;
