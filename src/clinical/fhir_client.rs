//! HTTP client for a FHIR clinical-records server

use log::{debug, error, info};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::clinical::{ClinicalStore, StoreFuture};
use crate::config::ServiceConfig;
use crate::error::{ResourceKind, Result, RiskServiceError};
use crate::models::fhir::{Bundle, BundleEntry, CreatedResource};
use crate::models::{ClinicalEntry, Demographics, MedicationEntry, PatientId, RiskAssessment};

const FHIR_JSON: &str = "application/json";

/// `ClinicalStore` backed by a FHIR REST API
///
/// Every request is bounded by the configured timeout. Nothing is retried.
#[derive(Debug, Clone)]
pub struct FhirClient {
    base_url: String,
    http: Client,
}

impl FhirClient {
    /// Create a client for the server named in the configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                RiskServiceError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let base_url = config.fhir_base_url.trim_end_matches('/').to_string();
        match Url::parse(&base_url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            Ok(_) => {
                return Err(RiskServiceError::Configuration(format!(
                    "FHIR base URL '{base_url}' cannot hold a path"
                )));
            }
            Err(e) => {
                return Err(RiskServiceError::Configuration(format!(
                    "Invalid FHIR base URL '{base_url}': {e}"
                )));
            }
        }

        Ok(Self { base_url, http })
    }

    /// Base URL requests are issued against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resource_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}", self.base_url, kind.as_str())
    }

    /// URL of a single Patient resource
    ///
    /// The id is pushed as one percent-encoded segment, so `/`, `?` and `#`
    /// inside it cannot address another resource.
    fn patient_url(&self, patient_id: &PatientId) -> Result<Url> {
        let id = patient_id.as_str();
        if matches!(id, "." | "..") {
            return Err(RiskServiceError::not_found(
                ResourceKind::Patient,
                id,
                "identifier is a relative path segment",
            ));
        }

        let mut url = Url::parse(&self.resource_url(ResourceKind::Patient)).map_err(|e| {
            RiskServiceError::not_found(ResourceKind::Patient, id, e.to_string())
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                RiskServiceError::not_found(ResourceKind::Patient, id, "base URL cannot hold a path")
            })?
            .push(id);
        Ok(url)
    }

    /// Send a read request and decode the body
    async fn read<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        patient_id: &PatientId,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request
            .header(ACCEPT, FHIR_JSON)
            .send()
            .await
            .map_err(|e| {
                error!("{kind} request failed for patient {patient_id}: {e}");
                RiskServiceError::not_found(kind, patient_id.as_str(), e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("{kind} not found for patient {patient_id}: server returned {status}");
            return Err(RiskServiceError::not_found(
                kind,
                patient_id.as_str(),
                format!("server returned {status}"),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            RiskServiceError::Validation(format!(
                "Malformed {kind} response for patient {patient_id}: {e}"
            ))
        })
    }

    /// Search a resource type by patient subject
    async fn search<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        patient_id: &PatientId,
    ) -> Result<Vec<BundleEntry<T>>> {
        let request = self
            .http
            .get(self.resource_url(kind))
            .query(&[("subject", patient_id.reference())]);
        let bundle: Bundle<T> = self.read(kind, patient_id, request).await?;
        let entries = bundle.into_entries();
        debug!(
            "Fetched {} {kind} entries for patient {patient_id}",
            entries.len()
        );
        Ok(entries)
    }

    async fn create(&self, assessment: &RiskAssessment) -> Result<String> {
        let subject = assessment
            .subject
            .as_ref()
            .map_or("<no subject>", |s| s.reference.as_str());

        let response = self
            .http
            .post(self.resource_url(ResourceKind::RiskAssessment))
            .header(ACCEPT, FHIR_JSON)
            .json(assessment)
            .send()
            .await
            .map_err(|e| {
                RiskServiceError::Persistence(format!(
                    "RiskAssessment request failed for {subject}: {e}"
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RiskServiceError::Persistence(format!(
                "Server rejected RiskAssessment for {subject}: {status}"
            )));
        }

        let created: CreatedResource = response.json().await.map_err(|e| {
            RiskServiceError::Persistence(format!(
                "Unreadable RiskAssessment response for {subject}: {e}"
            ))
        })?;

        let id = created.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            RiskServiceError::Persistence(format!(
                "Server assigned no id to RiskAssessment for {subject}"
            ))
        })?;

        info!("RiskAssessment {id} saved for {subject}");
        Ok(id)
    }
}

impl ClinicalStore for FhirClient {
    fn fetch_demographics<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Demographics> {
        Box::pin(async move {
            let url = self.patient_url(patient_id)?;
            self.read(ResourceKind::Patient, patient_id, self.http.get(url))
                .await
        })
    }

    fn fetch_observations<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<ClinicalEntry>> {
        Box::pin(self.search(ResourceKind::Observation, patient_id))
    }

    fn fetch_conditions<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<ClinicalEntry>> {
        Box::pin(self.search(ResourceKind::Condition, patient_id))
    }

    fn fetch_medication_statements<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<MedicationEntry>> {
        Box::pin(self.search(ResourceKind::MedicationStatement, patient_id))
    }

    fn create_risk_assessment<'a>(
        &'a self,
        assessment: &'a RiskAssessment,
    ) -> StoreFuture<'a, String> {
        Box::pin(self.create(assessment))
    }

    fn search_risk_assessments<'a>(
        &'a self,
        patient_id: &'a PatientId,
    ) -> StoreFuture<'a, Vec<RiskAssessment>> {
        Box::pin(async move {
            let entries = self
                .search::<RiskAssessment>(ResourceKind::RiskAssessment, patient_id)
                .await?;
            Ok(entries.into_iter().map(|entry| entry.resource).collect())
        })
    }
}
