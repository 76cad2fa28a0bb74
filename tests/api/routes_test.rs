use std::sync::Arc;

use cvd_risk::api::routes;
use cvd_risk::models::RiskAssessment;
use cvd_risk::{ForestScorer, ResourceKind, RiskPipeline};
use serde_json::{Value, json};
use warp::http::StatusCode;

use crate::utils::{FixedScorer, InMemoryStore, medication, pipeline, sample_model_path};

fn reference_pipeline() -> (Arc<InMemoryStore>, RiskPipeline) {
    let store = Arc::new(
        InMemoryStore::new()
            .with_patient("123", Some("1970-05-01"), Some("male"))
            .with_medications("123", vec![medication("BP_MEDS", Some("active"))]),
    );
    let pipeline = pipeline(&store, Arc::new(FixedScorer::new(0.73)));
    (store, pipeline)
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_predict_risk() {
    let (store, pipeline) = reference_pipeline();
    let api = routes(pipeline);

    let response = warp::test::request()
        .method("POST")
        .path("/predict-risk/")
        .json(&json!({"patient_id": "123"}))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.body()),
        json!({
            "patient_id": "123",
            "risk_score": 0.73,
            "risk_class": "High",
            "risk_assessment_id": "ra-1"
        })
    );
    assert_eq!(store.written().len(), 1);
}

#[tokio::test]
async fn test_predict_risk_without_trailing_slash() {
    let (_, pipeline) = reference_pipeline();
    let api = routes(pipeline);

    let response = warp::test::request()
        .method("POST")
        .path("/predict-risk")
        .json(&json!({"patient_id": "123"}))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_risk_with_sample_model() {
    let store = Arc::new(
        InMemoryStore::new()
            .with_patient("123", Some("1950-01-01"), Some("male"))
            .with_medications("123", vec![medication("BP_MEDS", Some("active"))]),
    );
    let api = routes(pipeline(
        &store,
        Arc::new(ForestScorer::new(sample_model_path(), true)),
    ));

    let response = warp::test::request()
        .method("POST")
        .path("/predict-risk/")
        .json(&json!({"patient_id": "123"}))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["risk_class"], "High");
    let score = body["risk_score"].as_f64().unwrap();
    assert!((score - 0.75).abs() < 1e-12, "{score}");
}

#[tokio::test]
async fn test_unknown_patient_returns_404() {
    let (store, pipeline) = reference_pipeline();
    let api = routes(pipeline);

    let response = warp::test::request()
        .method("POST")
        .path("/predict-risk/")
        .json(&json!({"patient_id": "404"}))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response.body()),
        json!({"detail": "Patient not found"})
    );
    assert!(store.written().is_empty());
}

#[tokio::test]
async fn test_failed_medication_lookup_returns_404() {
    let store = Arc::new(
        InMemoryStore::new()
            .with_patient("123", Some("1970-05-01"), Some("male"))
            .failing_on(ResourceKind::MedicationStatement),
    );
    let api = routes(pipeline(&store, Arc::new(FixedScorer::new(0.73))));

    let response = warp::test::request()
        .method("POST")
        .path("/predict-risk/")
        .json(&json!({"patient_id": "123"}))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response.body()),
        json!({"detail": "Medication status not found"})
    );
}

#[tokio::test]
async fn test_persistence_failure_returns_500() {
    let store = Arc::new(
        InMemoryStore::new()
            .with_patient("123", Some("1970-05-01"), Some("male"))
            .failing_writes(),
    );
    let api = routes(pipeline(&store, Arc::new(FixedScorer::new(0.73))));

    let response = warp::test::request()
        .method("POST")
        .path("/predict-risk/")
        .json(&json!({"patient_id": "123"}))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response.body())["detail"].is_string());
}

#[tokio::test]
async fn test_missing_model_returns_500() {
    let (store, _) = reference_pipeline();
    let api = routes(pipeline(
        &store,
        Arc::new(ForestScorer::new("/nonexistent/model.json", true)),
    ));

    let response = warp::test::request()
        .method("POST")
        .path("/predict-risk/")
        .json(&json!({"patient_id": "123"}))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response.body()),
        json!({"detail": "Model file not found."})
    );
    assert!(store.written().is_empty());
}

#[tokio::test]
async fn test_invalid_bodies_return_422() {
    let (store, pipeline) = reference_pipeline();
    let api = routes(pipeline);

    for body in [
        "not json".to_string(),
        json!({}).to_string(),
        json!({"patient_id": 123}).to_string(),
        json!({"patient_id": ""}).to_string(),
    ] {
        let response = warp::test::request()
            .method("POST")
            .path("/predict-risk/")
            .header("content-type", "application/json")
            .body(body.clone())
            .reply(&api)
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    }
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_method_on_predict() {
    let (_, pipeline) = reference_pipeline();
    let api = routes(pipeline);

    let response = warp::test::request()
        .method("GET")
        .path("/predict-risk/")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (_, pipeline) = reference_pipeline();
    let api = routes(pipeline);

    let response = warp::test::request()
        .method("GET")
        .path("/predict-everything")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let (_, pipeline) = reference_pipeline();
    let api = routes(pipeline);

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.body()), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_risk_assessments() {
    let mut stored = RiskAssessment::ten_year_chd("Patient/123".to_string(), 0.31);
    stored.id = Some("ra-9".to_string());
    let store = Arc::new(InMemoryStore::new().with_assessments("123", vec![stored]));
    let api = routes(pipeline(&store, Arc::new(FixedScorer::new(0.73))));

    let response = warp::test::request()
        .method("GET")
        .path("/risk-assessments/123")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.body()),
        json!([{
            "patient_id": "123",
            "risk_score": 0.31,
            "risk_class": "Low",
            "risk_assessment_id": "ra-9"
        }])
    );
}

#[tokio::test]
async fn test_list_risk_assessments_lookup_failure() {
    let store = Arc::new(InMemoryStore::new().failing_on(ResourceKind::RiskAssessment));
    let api = routes(pipeline(&store, Arc::new(FixedScorer::new(0.73))));

    let response = warp::test::request()
        .method("GET")
        .path("/risk-assessments/123")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response.body()),
        json!({"detail": "Risk assessments not found"})
    );
}
