//! Persisting risk predictions as RiskAssessment resources

use crate::clinical::ClinicalStore;
use crate::error::Result;
use crate::models::{AssessmentRecord, PatientId, RiskAssessment, RiskScore};

/// Write a ten-year CHD risk assessment for the patient
///
/// The assessment is created once and never updated. Failures surface as
/// `RiskServiceError::Persistence` without retry or local buffering.
pub async fn write_assessment(
    store: &dyn ClinicalStore,
    patient_id: &PatientId,
    score: RiskScore,
) -> Result<AssessmentRecord> {
    let assessment = RiskAssessment::ten_year_chd(patient_id.reference(), score.value());
    let id = store.create_risk_assessment(&assessment).await?;

    Ok(AssessmentRecord {
        id,
        patient_id: patient_id.clone(),
        score,
    })
}
