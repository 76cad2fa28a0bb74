//! A service that predicts ten-year cardiovascular risk for patients held on
//! a FHIR clinical-records server and records the result as a RiskAssessment.

pub mod api;
pub mod clinical;
pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::ServiceConfig;
pub use error::{ResourceKind, Result, RiskServiceError};
pub use models::{
    AssessmentRecord, Demographics, FeatureRecord, FeatureSchema, PatientId, PredictionResponse,
    RiskClass, RiskScore,
};

// Pipeline components
pub use clinical::{ClinicalStore, FhirClient};
pub use features::extract_features;
pub use pipeline::{PipelineStage, RiskPipeline};
pub use scoring::{ForestScorer, RiskScorer};
