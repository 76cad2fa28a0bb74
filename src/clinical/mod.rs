//! Clinical-records access
//!
//! The pipeline reads demographics and clinical entries through the
//! `ClinicalStore` trait and writes assessments back through it. `FhirClient`
//! is the HTTP implementation; tests substitute in-memory stores.

pub mod fhir_client;
pub mod writer;

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::models::{ClinicalEntry, Demographics, MedicationEntry, PatientId, RiskAssessment};

pub use fhir_client::FhirClient;
pub use writer::write_assessment;

/// Boxed future returned by clinical store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Read and write access to the clinical-records server
///
/// Every read fails with `RiskServiceError::NotFound` naming the resource
/// type when the lookup does not succeed. Empty result sets are not errors.
pub trait ClinicalStore: Send + Sync {
    /// Fetch the Patient resource
    fn fetch_demographics<'a>(&'a self, patient_id: &'a PatientId)
    -> StoreFuture<'a, Demographics>;

    /// Fetch all Observation entries of the patient
    fn fetch_observations<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<ClinicalEntry>>;

    /// Fetch all Condition entries of the patient
    fn fetch_conditions<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<ClinicalEntry>>;

    /// Fetch all MedicationStatement entries of the patient
    fn fetch_medication_statements<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<MedicationEntry>>;

    /// Create a RiskAssessment and return its server-assigned id
    ///
    /// Fails with `RiskServiceError::Persistence`.
    fn create_risk_assessment<'a>(
        &'a self,
        assessment: &'a RiskAssessment,
    ) -> StoreFuture<'a, String>;

    /// Fetch all RiskAssessments recorded for the patient
    fn search_risk_assessments<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<RiskAssessment>>;
}
