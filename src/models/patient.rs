//! Patient identity and demographics
//!
//! This module contains the patient identifier carried by every request and
//! the demographic fields the feature pipeline reads from the Patient resource.

use std::fmt;

use serde::Deserialize;

use crate::error::{Result, RiskServiceError};

/// Opaque identifier of a patient record on the clinical-records server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Create a patient identifier, rejecting empty values
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(RiskServiceError::Validation(
                "patient_id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reference string pointing at this patient (`Patient/{id}`)
    #[must_use]
    pub fn reference(&self) -> String {
        format!("Patient/{}", self.0)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Administrative gender as far as the feature pipeline cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    /// Female, other, unknown or absent
    NotMale,
}

impl From<Option<&str>> for Gender {
    fn from(label: Option<&str>) -> Self {
        match label {
            Some("male") => Gender::Male,
            _ => Gender::NotMale,
        }
    }
}

/// Demographic fields of a Patient resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Demographics {
    /// Server-assigned resource id
    #[serde(default)]
    pub id: Option<String>,
    /// Birth date as sent by the server, normally `YYYY-MM-DD`
    #[serde(default, rename = "birthDate")]
    pub birth_date: Option<String>,
    /// Administrative gender label (`male`, `female`, `other`, `unknown`)
    #[serde(default)]
    pub gender: Option<String>,
}

impl Demographics {
    /// Create demographics from raw labels
    #[must_use]
    pub fn new(birth_date: Option<&str>, gender: Option<&str>) -> Self {
        Self {
            id: None,
            birth_date: birth_date.map(str::to_string),
            gender: gender.map(str::to_string),
        }
    }

    /// Gender classification of the patient
    #[must_use]
    pub fn gender(&self) -> Gender {
        Gender::from(self.gender.as_deref())
    }

    /// Year component of the birth date
    ///
    /// Only the leading `YYYY` segment is read; month and day are ignored.
    pub fn birth_year(&self) -> Result<i32> {
        let birth_date = self
            .birth_date
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RiskServiceError::Validation("Birth date is missing".to_string()))?;

        let year = birth_date.split('-').next().unwrap_or_default();
        year.trim().parse::<i32>().map_err(|_| {
            RiskServiceError::Validation(format!("Birth date '{birth_date}' has no valid year"))
        })
    }

    /// Age as a calendar-year difference
    ///
    /// This is `current_year - birth_year`, not elapsed time: a patient born
    /// on 31 December is counted a full year older on 1 January.
    pub fn age_in(&self, current_year: i32) -> Result<i32> {
        Ok(current_year - self.birth_year()?)
    }
}
