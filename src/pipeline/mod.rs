//! Request orchestration
//!
//! One `predict` call runs the stages below strictly in order. The first
//! error aborts the run; nothing is retried or rolled back, and an
//! assessment is only written once a score exists.
//!
//! `FetchDemographics -> FetchClinicalEntries -> ExtractFeatures -> Score -> Persist`

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, Local};
use log::info;

use crate::clinical::{ClinicalStore, write_assessment};
use crate::error::{Result, RiskServiceError};
use crate::features::extract_features;
use crate::models::{AssessmentRecord, FeatureRecord, PatientId, PredictionResponse, RiskScore};
use crate::scoring::RiskScorer;
use crate::utils::logging::{log_stage_complete, log_stage_failure, log_stage_start};

/// Stages of a prediction run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    FetchDemographics,
    FetchClinicalEntries,
    ExtractFeatures,
    Score,
    Persist,
}

impl PipelineStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchDemographics => "FetchDemographics",
            Self::FetchClinicalEntries => "FetchClinicalEntries",
            Self::ExtractFeatures => "ExtractFeatures",
            Self::Score => "Score",
            Self::Persist => "Persist",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current calendar year in local time
#[must_use]
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Feature extraction, scoring and write-back for single patients
///
/// Cloning is cheap; clones share the store and scorer.
#[derive(Clone)]
pub struct RiskPipeline {
    store: Arc<dyn ClinicalStore>,
    scorer: Arc<dyn RiskScorer>,
}

impl RiskPipeline {
    pub fn new(store: Arc<dyn ClinicalStore>, scorer: Arc<dyn RiskScorer>) -> Self {
        Self { store, scorer }
    }

    /// Predict, persist and report the ten-year risk for one patient
    pub async fn predict(&self, patient_id: &PatientId) -> Result<PredictionResponse> {
        info!("Starting risk prediction for patient {patient_id}");
        let start = Instant::now();

        let record = self.run(patient_id).await?;

        info!(
            "Risk prediction for patient {patient_id} finished in {:?}: score {:.4} ({})",
            start.elapsed(),
            record.score.value(),
            record.score.class()
        );
        Ok(record.into())
    }

    /// Previously persisted assessments of a patient
    ///
    /// Resources without an id or a valid probability are skipped.
    pub async fn assessments(&self, patient_id: &PatientId) -> Result<Vec<AssessmentRecord>> {
        let resources = self.store.search_risk_assessments(patient_id).await?;

        Ok(resources
            .into_iter()
            .filter_map(|resource| {
                let probability = resource.probability()?;
                let score = RiskScore::new(probability).ok()?;
                Some(AssessmentRecord {
                    id: resource.id?,
                    patient_id: patient_id.clone(),
                    score,
                })
            })
            .collect())
    }

    async fn run(&self, patient_id: &PatientId) -> Result<AssessmentRecord> {
        let store = self.store.as_ref();

        // Age is derived here so a missing birth date stops the run before
        // any further request is made
        let (age, gender) = Self::stage(PipelineStage::FetchDemographics, patient_id, async {
            let demographics = store.fetch_demographics(patient_id).await?;
            let age = demographics.age_in(current_year())?;
            Ok((age, demographics.gender()))
        })
        .await?;

        let (observations, conditions, medications) =
            Self::stage(PipelineStage::FetchClinicalEntries, patient_id, async {
                futures::try_join!(
                    store.fetch_observations(patient_id),
                    store.fetch_conditions(patient_id),
                    store.fetch_medication_statements(patient_id),
                )
            })
            .await?;

        let features = Self::stage(PipelineStage::ExtractFeatures, patient_id, async {
            Ok(extract_features(
                age,
                gender,
                &observations,
                &conditions,
                &medications,
            ))
        })
        .await?;

        let score =
            Self::stage(PipelineStage::Score, patient_id, self.score(features)).await?;

        Self::stage(
            PipelineStage::Persist,
            patient_id,
            write_assessment(store, patient_id, score),
        )
        .await
    }

    /// Run the scorer on the blocking pool; loading the model touches disk
    async fn score(&self, features: FeatureRecord) -> Result<RiskScore> {
        let scorer = Arc::clone(&self.scorer);
        tokio::task::spawn_blocking(move || scorer.score(&features))
            .await
            .map_err(|e| RiskServiceError::Scoring(format!("Scoring task failed: {e}")))?
    }

    async fn stage<T, F>(stage: PipelineStage, patient_id: &PatientId, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        log_stage_start(stage, patient_id);
        let start = Instant::now();

        match work.await {
            Ok(value) => {
                log_stage_complete(stage, patient_id, start.elapsed());
                Ok(value)
            }
            Err(e) => {
                log_stage_failure(stage, patient_id, &e);
                Err(e)
            }
        }
    }
}
