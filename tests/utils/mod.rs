use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cvd_risk::clinical::{ClinicalStore, StoreFuture};
use cvd_risk::models::fhir::BundleEntry;
use cvd_risk::models::{ClinicalEntry, MedicationEntry, MedicationStatement, RiskAssessment};
use cvd_risk::{
    Demographics, FeatureRecord, PatientId, ResourceKind, Result, RiskPipeline, RiskScore,
    RiskScorer, RiskServiceError,
};

/// Path of the sample forest shipped with the crate
#[must_use]
pub fn sample_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/random_forest_model.json")
}

/// Wrap a medication statement in a search entry
#[must_use]
pub fn medication(code: &str, status: Option<&str>) -> MedicationEntry {
    BundleEntry {
        resource: MedicationStatement::new(code, status),
    }
}

/// In-memory clinical store recording every call
#[derive(Default)]
pub struct InMemoryStore {
    pub patients: HashMap<String, Demographics>,
    pub medications: HashMap<String, Vec<MedicationEntry>>,
    pub observations: HashMap<String, Vec<ClinicalEntry>>,
    pub assessments: HashMap<String, Vec<RiskAssessment>>,
    /// Resource kinds whose lookups fail
    pub failing: HashSet<ResourceKind>,
    pub fail_writes: bool,
    pub calls: Mutex<Vec<ResourceKind>>,
    pub written: Mutex<Vec<RiskAssessment>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_patient(mut self, id: &str, birth_date: Option<&str>, gender: Option<&str>) -> Self {
        self.patients
            .insert(id.to_string(), Demographics::new(birth_date, gender));
        self
    }

    #[must_use]
    pub fn with_medications(mut self, id: &str, entries: Vec<MedicationEntry>) -> Self {
        self.medications.insert(id.to_string(), entries);
        self
    }

    #[must_use]
    pub fn with_assessments(mut self, id: &str, assessments: Vec<RiskAssessment>) -> Self {
        self.assessments.insert(id.to_string(), assessments);
        self
    }

    #[must_use]
    pub fn failing_on(mut self, kind: ResourceKind) -> Self {
        self.failing.insert(kind);
        self
    }

    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<ResourceKind> {
        self.calls.lock().unwrap().clone()
    }

    pub fn written(&self) -> Vec<RiskAssessment> {
        self.written.lock().unwrap().clone()
    }

    fn record(&self, kind: ResourceKind, patient_id: &PatientId) -> Result<()> {
        self.calls.lock().unwrap().push(kind);
        if self.failing.contains(&kind) {
            return Err(RiskServiceError::not_found(
                kind,
                patient_id.as_str(),
                "server returned 500",
            ));
        }
        Ok(())
    }
}

impl ClinicalStore for InMemoryStore {
    fn fetch_demographics<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Demographics> {
        Box::pin(async move {
            self.record(ResourceKind::Patient, patient_id)?;
            self.patients.get(patient_id.as_str()).cloned().ok_or_else(|| {
                RiskServiceError::not_found(
                    ResourceKind::Patient,
                    patient_id.as_str(),
                    "server returned 404",
                )
            })
        })
    }

    fn fetch_observations<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<ClinicalEntry>> {
        Box::pin(async move {
            self.record(ResourceKind::Observation, patient_id)?;
            Ok(self
                .observations
                .get(patient_id.as_str())
                .cloned()
                .unwrap_or_default())
        })
    }

    fn fetch_conditions<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<ClinicalEntry>> {
        Box::pin(async move {
            self.record(ResourceKind::Condition, patient_id)?;
            Ok(Vec::new())
        })
    }

    fn fetch_medication_statements<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<MedicationEntry>> {
        Box::pin(async move {
            self.record(ResourceKind::MedicationStatement, patient_id)?;
            Ok(self
                .medications
                .get(patient_id.as_str())
                .cloned()
                .unwrap_or_default())
        })
    }

    fn create_risk_assessment<'a>(
        &'a self,
        assessment: &'a RiskAssessment,
    ) -> StoreFuture<'a, String> {
        Box::pin(async move {
            if self.fail_writes {
                return Err(RiskServiceError::Persistence(
                    "server returned 500".to_string(),
                ));
            }
            let mut written = self.written.lock().unwrap();
            written.push(assessment.clone());
            Ok(format!("ra-{}", written.len()))
        })
    }

    fn search_risk_assessments<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<RiskAssessment>> {
        Box::pin(async move {
            self.record(ResourceKind::RiskAssessment, patient_id)?;
            Ok(self
                .assessments
                .get(patient_id.as_str())
                .cloned()
                .unwrap_or_default())
        })
    }
}

/// Scorer returning a fixed probability and remembering what it was given
pub struct FixedScorer {
    probability: f64,
    pub seen: Mutex<Vec<FeatureRecord>>,
    pub calls: AtomicUsize,
}

impl FixedScorer {
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_features(&self) -> Option<FeatureRecord> {
        self.seen.lock().unwrap().last().copied()
    }
}

impl RiskScorer for FixedScorer {
    fn score(&self, features: &FeatureRecord) -> Result<RiskScore> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(*features);
        RiskScore::new(self.probability)
    }
}

/// Scorer that always fails with the error produced by `make_error`
pub struct FailingScorer {
    pub make_error: fn() -> RiskServiceError,
}

impl RiskScorer for FailingScorer {
    fn score(&self, _features: &FeatureRecord) -> Result<RiskScore> {
        Err((self.make_error)())
    }
}

/// Build a pipeline over shared test doubles
pub fn pipeline(store: &Arc<InMemoryStore>, scorer: Arc<dyn RiskScorer>) -> RiskPipeline {
    let store: Arc<dyn ClinicalStore> = Arc::clone(store) as Arc<dyn ClinicalStore>;
    RiskPipeline::new(store, scorer)
}
