use std::sync::Arc;

use anyhow::Context;
use cvd_risk::{FhirClient, ForestScorer, RiskPipeline, ServiceConfig, api};
use log::{info, warn};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env().context("Invalid service configuration")?;
    info!("Clinical-records server: {}", config.fhir_base_url);
    info!(
        "Model artifact: {} (cached: {})",
        config.model_path.display(),
        config.cache_model
    );

    if !config.model_path.is_file() {
        // Requests fail with a model error until the artifact appears
        warn!("Model file not found: {}", config.model_path.display());
    }

    let store = FhirClient::new(&config).context("Failed to create clinical-records client")?;
    let scorer = ForestScorer::from_config(&config);
    let pipeline = RiskPipeline::new(Arc::new(store), Arc::new(scorer));

    api::serve(config.bind_addr, pipeline)
        .await
        .context("Risk prediction API failed")?;

    Ok(())
}
