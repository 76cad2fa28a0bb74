//! Domain models for the risk prediction service
//!
//! This module contains the patient, clinical-record, feature and risk types
//! that flow through the prediction pipeline.

pub mod feature;
pub mod fhir;
pub mod patient;
pub mod risk;

// Re-export commonly used types
pub use feature::{FeatureRecord, FeatureSchema};
pub use fhir::{ClinicalEntry, MedicationEntry, MedicationStatement, RiskAssessment};
pub use patient::{Demographics, Gender, PatientId};
pub use risk::{AssessmentRecord, PredictionResponse, RiskClass, RiskScore};
