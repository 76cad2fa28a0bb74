//! Configuration for the risk prediction service.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, RiskServiceError};

/// Default base URL of the clinical-records (FHIR) server
pub const DEFAULT_FHIR_BASE_URL: &str = "http://fhir-server:8080/fhir";

/// Default location of the trained model artifact
pub const DEFAULT_MODEL_PATH: &str = "random_forest_model.json";

/// Default address the HTTP server binds to
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default timeout for each outbound clinical-records request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the risk prediction service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the clinical-records server, without trailing slash
    pub fhir_base_url: String,
    /// Path of the serialized classifier
    pub model_path: PathBuf,
    /// Address for the inbound HTTP server
    pub bind_addr: SocketAddr,
    /// Timeout applied to every outbound clinical-records call
    pub request_timeout: Duration,
    /// Keep the parsed model in memory after the first request
    pub cache_model: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fhir_base_url: DEFAULT_FHIR_BASE_URL.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_model: true,
        }
    }
}

impl ServiceConfig {
    /// Build a configuration from the process environment
    ///
    /// Unset variables keep their defaults. Recognised variables are
    /// `FHIR_SERVER_URL`, `MODEL_PATH`, `BIND_ADDR`, `FHIR_TIMEOUT_SECS`
    /// and `MODEL_CACHE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("FHIR_SERVER_URL") {
            config = config.with_fhir_base_url(url);
        }
        if let Some(path) = lookup("MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = parse_value("BIND_ADDR", &addr)?;
        }
        if let Some(secs) = lookup("FHIR_TIMEOUT_SECS") {
            let secs: u64 = parse_value("FHIR_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(RiskServiceError::Configuration(
                    "FHIR_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = lookup("MODEL_CACHE") {
            config.cache_model = parse_value("MODEL_CACHE", &flag)?;
        }

        Ok(config)
    }

    /// Set the clinical-records base URL, dropping any trailing slash
    #[must_use]
    pub fn with_fhir_base_url(mut self, url: impl Into<String>) -> Self {
        self.fhir_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| RiskServiceError::Configuration(format!("Invalid {key} '{raw}': {e}")))
}
