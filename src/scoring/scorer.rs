//! Artifact-backed risk scorer

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};
use once_cell::sync::OnceCell;

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::error::util::read_artifact;
use crate::models::{FeatureRecord, FeatureSchema, RiskScore};
use crate::scoring::{RandomForest, RiskScorer};

/// Scores feature records with a random forest loaded from disk
///
/// With caching enabled the forest is parsed on first use and shared
/// read-only afterwards. A failed load is not cached, so a model that
/// appears later is picked up by the next request.
#[derive(Debug)]
pub struct ForestScorer {
    path: PathBuf,
    cache: Option<OnceCell<RandomForest>>,
}

impl ForestScorer {
    /// Create a scorer for the artifact at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, cache_model: bool) -> Self {
        Self {
            path: path.into(),
            cache: cache_model.then(OnceCell::new),
        }
    }

    /// Create a scorer from the service configuration
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.model_path.clone(), config.cache_model)
    }

    /// Location of the model artifact
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse and validate the artifact
    pub fn load(&self) -> Result<RandomForest> {
        info!("Loading the trained model from {}", self.path.display());
        let start = Instant::now();

        let content = read_artifact(&self.path, "risk model")?;
        let forest = RandomForest::from_json(&content)?;
        forest.validate(FeatureRecord::FEATURE_NAMES)?;

        info!(
            "Model loaded successfully: {} trees in {:?}",
            forest.trees.len(),
            start.elapsed()
        );
        Ok(forest)
    }

    fn with_forest<T>(&self, f: impl FnOnce(&RandomForest) -> Result<T>) -> Result<T> {
        match &self.cache {
            Some(cell) => f(cell.get_or_try_init(|| self.load())?),
            None => f(&self.load()?),
        }
    }
}

impl RiskScorer for ForestScorer {
    fn score(&self, features: &FeatureRecord) -> Result<RiskScore> {
        debug!("Scoring features {:?}", features.named_values());
        self.with_forest(|forest| {
            let probability = forest.positive_probability(&features.to_vector())?;
            RiskScore::new(probability)
        })
    }
}
