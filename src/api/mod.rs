//! Inbound HTTP API
//!
//! - `POST /predict-risk/` scores a patient and records the assessment
//! - `GET /risk-assessments/{patient_id}` lists recorded assessments
//! - `GET /health` liveness probe
//!
//! Failures are answered with `{"detail": "..."}`.

use std::convert::Infallible;
use std::net::SocketAddr;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use warp::filters::path::Tail;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::error::{Result, RiskServiceError};
use crate::models::{PatientId, PredictionResponse};
use crate::pipeline::RiskPipeline;

/// Largest accepted request body
pub const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Body of a prediction request
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub patient_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

fn error_reply(status: StatusCode, detail: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { detail }), status).into_response()
}

fn service_error_reply(err: &RiskServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_reply(status, err.detail())
}

// Helper to inject the pipeline into warp filters
fn with_pipeline(
    pipeline: RiskPipeline,
) -> impl Filter<Extract = (RiskPipeline,), Error = Infallible> + Clone {
    warp::any().map(move || pipeline.clone())
}

/// Matches when nothing but an optional trailing slash is left of the path
fn end_of_path() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::tail()
        .and_then(|tail: Tail| async move {
            if tail.as_str().is_empty() {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}

/// All routes of the service
pub fn routes(
    pipeline: RiskPipeline,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    // Path filters come before method filters so unknown paths stay 404
    let predict = warp::path("predict-risk")
        .and(end_of_path())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_pipeline(pipeline.clone()))
        .and_then(predict_risk);

    let assessments = warp::path("risk-assessments")
        .and(warp::path::param::<String>())
        .and(end_of_path())
        .and(warp::get())
        .and(with_pipeline(pipeline))
        .and_then(list_assessments);

    let health = warp::path("health")
        .and(end_of_path())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    predict
        .or(assessments)
        .or(health)
        .recover(handle_rejection)
}

async fn predict_risk(
    body: Bytes,
    pipeline: RiskPipeline,
) -> std::result::Result<Response, Rejection> {
    let request: PredictRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected prediction request: {e}");
            return Ok(error_reply(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid request body",
            ));
        }
    };

    let patient_id = match PatientId::new(request.patient_id) {
        Ok(id) => id,
        Err(e) => {
            warn!("Rejected prediction request: {e}");
            return Ok(error_reply(
                StatusCode::UNPROCESSABLE_ENTITY,
                "patient_id must not be empty",
            ));
        }
    };

    match pipeline.predict(&patient_id).await {
        Ok(response) => Ok(warp::reply::json(&response).into_response()),
        Err(e) => {
            error!("Error during risk prediction for patient {patient_id}: {e}");
            Ok(service_error_reply(&e))
        }
    }
}

async fn list_assessments(
    patient_id: String,
    pipeline: RiskPipeline,
) -> std::result::Result<Response, Rejection> {
    let patient_id = match PatientId::new(patient_id) {
        Ok(id) => id,
        Err(_) => return Err(warp::reject::not_found()),
    };

    match pipeline.assessments(&patient_id).await {
        Ok(records) => {
            let body: Vec<PredictionResponse> =
                records.into_iter().map(PredictionResponse::from).collect();
            Ok(warp::reply::json(&body).into_response())
        }
        Err(e) => {
            error!("Error listing risk assessments for patient {patient_id}: {e}");
            Ok(service_error_reply(&e))
        }
    }
}

async fn handle_rejection(err: Rejection) -> std::result::Result<Response, Infallible> {
    let (status, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Length Required")
    } else {
        warn!("Unhandled rejection: {err:?}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };

    Ok(error_reply(status, detail))
}

/// Serve the API until Ctrl-C is received
pub async fn serve(addr: SocketAddr, pipeline: RiskPipeline) -> Result<()> {
    let (bound, server) = warp::serve(routes(pipeline))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {e}");
            }
        })
        .map_err(|e| RiskServiceError::Configuration(format!("Failed to bind {addr}: {e}")))?;

    info!("Risk prediction API listening on http://{bound}");
    server.await;
    info!("Risk prediction API stopped");
    Ok(())
}
