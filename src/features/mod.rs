//! Feature extraction
//!
//! Builds the model input record for a patient. Beyond age and gender, the
//! only signal currently derived from clinical data is whether the patient
//! takes an active blood-pressure medication. Observations and conditions
//! are accepted but every other clinical feature stays at its default.

use log::debug;

use crate::models::{ClinicalEntry, FeatureRecord, Gender, MedicationEntry};

/// 1 for male, 0 for any other or absent gender
#[must_use]
pub fn gender_flag(gender: Gender) -> u8 {
    match gender {
        Gender::Male => 1,
        Gender::NotMale => 0,
    }
}

/// 1 if any statement is an active `BP_MEDS` medication, else 0
#[must_use]
pub fn bp_medication_flag(medications: &[MedicationEntry]) -> u8 {
    u8::from(
        medications
            .iter()
            .any(|entry| entry.resource.is_active_bp_medication()),
    )
}

/// Build the feature record for one request
#[must_use]
pub fn extract_features(
    age: i32,
    gender: Gender,
    observations: &[ClinicalEntry],
    conditions: &[ClinicalEntry],
    medications: &[MedicationEntry],
) -> FeatureRecord {
    debug!(
        "Extracting features from {} observations, {} conditions, {} medication statements",
        observations.len(),
        conditions.len(),
        medications.len()
    );

    FeatureRecord {
        age,
        gender: gender_flag(gender),
        bp_meds: bp_medication_flag(medications),
        ..FeatureRecord::default()
    }
}
