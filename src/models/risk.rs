//! Risk scores, classes and persisted assessments

use std::fmt;

use serde::Serialize;

use crate::error::{Result, RiskServiceError};
use crate::models::patient::PatientId;

/// Scores strictly above this value are classified as high risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.5;

/// Probability of the positive (high-risk) class, always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RiskScore(f64);

impl RiskScore {
    /// Wrap a probability, rejecting NaN, infinities and values outside [0, 1]
    pub fn new(probability: f64) -> Result<Self> {
        if probability.is_finite() && (0.0..=1.0).contains(&probability) {
            Ok(Self(probability))
        } else {
            Err(RiskServiceError::Scoring(format!(
                "Probability {probability} is outside [0, 1]"
            )))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn class(self) -> RiskClass {
        RiskClass::from(self)
    }
}

/// Coarse label derived from a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskClass {
    High,
    Low,
}

impl From<RiskScore> for RiskClass {
    fn from(score: RiskScore) -> Self {
        if score.value() > HIGH_RISK_THRESHOLD {
            RiskClass::High
        } else {
            RiskClass::Low
        }
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskClass::High => f.write_str("High"),
            RiskClass::Low => f.write_str("Low"),
        }
    }
}

/// A risk prediction persisted on the clinical-records server
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRecord {
    /// Server-assigned identifier
    pub id: String,
    pub patient_id: PatientId,
    pub score: RiskScore,
}

/// Successful response of the prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub patient_id: String,
    pub risk_score: f64,
    pub risk_class: RiskClass,
    pub risk_assessment_id: String,
}

impl From<AssessmentRecord> for PredictionResponse {
    fn from(record: AssessmentRecord) -> Self {
        Self {
            patient_id: record.patient_id.as_str().to_string(),
            risk_score: record.score.value(),
            risk_class: record.score.class(),
            risk_assessment_id: record.id,
        }
    }
}
