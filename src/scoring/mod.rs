//! Risk scoring
//!
//! The pipeline only depends on the `RiskScorer` trait; any implementation
//! that maps the ordered feature record to a positive-class probability can
//! stand in for the trained model.

pub mod forest;
pub mod scorer;

use crate::error::Result;
use crate::models::{FeatureRecord, RiskScore};

pub use forest::RandomForest;
pub use scorer::ForestScorer;

/// Maps a feature record to the probability of the high-risk class
pub trait RiskScorer: Send + Sync {
    /// Score one record
    ///
    /// Fails with `RiskServiceError::ModelUnavailable` when the model cannot
    /// be located and `RiskServiceError::Scoring` for any other failure.
    fn score(&self, features: &FeatureRecord) -> Result<RiskScore>;
}
