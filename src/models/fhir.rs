//! Clinical-records wire types
//!
//! Minimal serde views of the FHIR resources the service exchanges with the
//! clinical-records server. Only the fields the pipeline touches are modelled;
//! everything else in a payload is ignored on read.

use serde::{Deserialize, Serialize};

/// Medication code identifying blood-pressure medication
pub const BP_MEDICATION_CODE: &str = "BP_MEDS";

/// Status of a medication statement the patient is currently taking
pub const ACTIVE_STATUS: &str = "active";

/// Status assumed when a medication statement carries none
pub const DEFAULT_MEDICATION_STATUS: &str = "stopped";

/// Outcome text attached to every persisted prediction
pub const TEN_YEAR_CHD_OUTCOME: &str = "TenYearCHD";

/// Search result set returned by the server
#[derive(Debug, Clone, Deserialize)]
pub struct Bundle<T> {
    /// Matching entries; an absent array means no matches
    #[serde(default = "Vec::new")]
    pub entry: Vec<BundleEntry<T>>,
}

impl<T> Bundle<T> {
    /// Unwrap the bundle into its entries
    #[must_use]
    pub fn into_entries(self) -> Vec<BundleEntry<T>> {
        self.entry
    }
}

/// A single search match
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BundleEntry<T> {
    pub resource: T,
}

/// Observation and Condition entries are passed through untyped
pub type ClinicalEntry = BundleEntry<serde_json::Value>;

/// Medication statement entries
pub type MedicationEntry = BundleEntry<MedicationStatement>;

/// A coded value from a terminology system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A concept expressed as codings and/or free text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Concept carrying only free text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Code of the first coding, if any
    #[must_use]
    pub fn first_code(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.code.as_deref())
    }
}

/// Statement that a patient is, was or will be taking a medication
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MedicationStatement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "medicationCodeableConcept")]
    pub medication: Option<CodeableConcept>,
}

impl MedicationStatement {
    /// Create a statement for a single coded medication
    #[must_use]
    pub fn new(code: &str, status: Option<&str>) -> Self {
        Self {
            id: None,
            status: status.map(str::to_string),
            medication: Some(CodeableConcept {
                coding: vec![Coding {
                    code: Some(code.to_string()),
                    ..Coding::default()
                }],
                text: None,
            }),
        }
    }

    /// Medication code; only the first coding is considered
    #[must_use]
    pub fn medication_code(&self) -> Option<&str> {
        self.medication.as_ref().and_then(CodeableConcept::first_code)
    }

    /// Statement status, `stopped` when absent
    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_MEDICATION_STATUS)
    }

    /// Whether this is an active blood-pressure medication
    #[must_use]
    pub fn is_active_bp_medication(&self) -> bool {
        self.medication_code() == Some(BP_MEDICATION_CODE) && self.status() == ACTIVE_STATUS
    }
}

/// Reference from one resource to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

/// One predicted outcome inside a RiskAssessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CodeableConcept>,
    #[serde(
        default,
        rename = "probabilityDecimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub probability_decimal: Option<f64>,
}

/// RiskAssessment resource as written to and read from the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(rename = "resourceType", default = "risk_assessment_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prediction: Vec<RiskPrediction>,
}

fn risk_assessment_type() -> String {
    "RiskAssessment".to_string()
}

impl RiskAssessment {
    /// New, not yet persisted, ten-year CHD assessment for a patient
    #[must_use]
    pub fn ten_year_chd(subject_reference: String, probability: f64) -> Self {
        Self {
            resource_type: risk_assessment_type(),
            id: None,
            subject: Some(Reference {
                reference: subject_reference,
            }),
            prediction: vec![RiskPrediction {
                outcome: Some(CodeableConcept::text(TEN_YEAR_CHD_OUTCOME)),
                probability_decimal: Some(probability),
            }],
        }
    }

    /// Probability of the first prediction that carries one
    #[must_use]
    pub fn probability(&self) -> Option<f64> {
        self.prediction.iter().find_map(|p| p.probability_decimal)
    }
}

/// Server response to a create request
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    #[serde(default)]
    pub id: Option<String>,
}
