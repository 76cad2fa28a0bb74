//! Model input features
//!
//! The `FeatureRecord` field order is the column order the classifier was
//! trained on. Reordering, adding or removing fields is a schema change and
//! requires a retrained model artifact.

use macros::FeatureSchema;

/// An ordered, named numeric input vector for a model
///
/// Implemented by `#[derive(FeatureSchema)]`; field declaration order is
/// vector order.
pub trait FeatureSchema {
    /// Number of features
    const WIDTH: usize;

    /// Feature names in vector order
    const FEATURE_NAMES: &'static [&'static str];

    /// Feature values in vector order
    fn to_vector(&self) -> Vec<f64>;

    /// Feature values paired with their names
    fn named_values(&self) -> Vec<(&'static str, f64)> {
        Self::FEATURE_NAMES
            .iter()
            .copied()
            .zip(self.to_vector())
            .collect()
    }
}

/// Education level used when none is known
pub const DEFAULT_EDUCATION_LEVEL: u8 = 1;

/// The 15 cardiovascular risk inputs
#[derive(Debug, Clone, Copy, PartialEq, FeatureSchema)]
pub struct FeatureRecord {
    #[model_feature(name = "age")]
    pub age: i32,
    #[model_feature(name = "gender")]
    pub gender: u8,
    #[model_feature(name = "BPMeds")]
    pub bp_meds: u8,
    #[model_feature(name = "BMI")]
    pub bmi: f64,
    #[model_feature(name = "totChol")]
    pub total_cholesterol: f64,
    #[model_feature(name = "sysBP")]
    pub systolic_bp: f64,
    #[model_feature(name = "diaBP")]
    pub diastolic_bp: f64,
    #[model_feature(name = "glucose")]
    pub glucose: f64,
    #[model_feature(name = "heartRate")]
    pub heart_rate: f64,
    #[model_feature(name = "is_smoking")]
    pub is_smoking: u8,
    #[model_feature(name = "education")]
    pub education: u8,
    #[model_feature(name = "cigsPerDay")]
    pub cigs_per_day: f64,
    #[model_feature(name = "prevalentStroke")]
    pub prevalent_stroke: u8,
    #[model_feature(name = "prevalentHyp")]
    pub prevalent_hyp: u8,
    #[model_feature(name = "diabetes")]
    pub diabetes: u8,
}

impl Default for FeatureRecord {
    /// Every clinical value zero, education at the unknown-level sentinel
    fn default() -> Self {
        Self {
            age: 0,
            gender: 0,
            bp_meds: 0,
            bmi: 0.0,
            total_cholesterol: 0.0,
            systolic_bp: 0.0,
            diastolic_bp: 0.0,
            glucose: 0.0,
            heart_rate: 0.0,
            is_smoking: 0,
            education: DEFAULT_EDUCATION_LEVEL,
            cigs_per_day: 0.0,
            prevalent_stroke: 0,
            prevalent_hyp: 0,
            diabetes: 0,
        }
    }
}
