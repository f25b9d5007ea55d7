//! HTTP surface exercised through `tower::ServiceExt::oneshot`.

mod common;

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, StatusCode},
    Router,
};
use common::{multipart_content_type, multipart_image, multipart_without_image, ScriptedModel};
use crop_doctor::server::{build_app, AnalysisResponse, AppState, ErrorBody, StateView};
use crop_doctor::theme::Theme;
use crop_doctor::{ModelError, Phase};
use tower::ServiceExt;

const LIMIT: usize = 1024 * 1024;

fn app_with(model: Arc<ScriptedModel>, limit: usize) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(model, "english", Theme::Meadow));
    let app = build_app(state.clone(), limit, Path::new("static"));
    (app, state)
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(body))
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

#[tokio::test]
async fn index_renders_detection_form() {
    let (app, _) = app_with(ScriptedModel::new(vec![]), LIMIT);

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("accept=\"image/*\""));
    assert!(html.contains(" disabled>Identify Disease</button>"));
    assert!(html.contains("Contact Us"));
}

#[tokio::test]
async fn api_identify_runs_both_steps() {
    let model = ScriptedModel::new(vec![
        Ok("**Symptoms:** leaf curl".to_string()),
        Ok("Is it a virus?\nHow does it spread?".to_string()),
    ]);
    let (app, _) = app_with(model.clone(), LIMIT);

    let response = app
        .oneshot(multipart_request(
            "/api/identify",
            multipart_image("leaf.png", "image/png", b"png-bytes"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: AnalysisResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body.succeeded);
    assert_eq!(body.result, "Symptoms: leaf curl");
    assert_eq!(
        body.follow_up_questions,
        vec!["Is it a virus?", "How does it spread?"]
    );
    assert_eq!(body.model, "scripted-model");
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn api_identify_without_image_is_bad_request() {
    let model = ScriptedModel::new(vec![]);
    let (app, _) = app_with(model.clone(), LIMIT);

    let response = app
        .oneshot(multipart_request("/api/identify", multipart_without_image()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.error, "No image selected");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn analysis_failure_is_reported_in_result() {
    let model = ScriptedModel::new(vec![Err(ModelError::Other("timeout".to_string()))]);
    let (app, _) = app_with(model.clone(), LIMIT);

    let response = app
        .oneshot(multipart_request(
            "/api/identify",
            multipart_image("leaf.jpg", "image/jpeg", b"jpeg"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: AnalysisResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!body.succeeded);
    assert_eq!(body.result, "Error identifying crop disease: timeout");
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn selected_image_is_served_back() {
    let (app, _) = app_with(ScriptedModel::new(vec![]), LIMIT);

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/image",
            multipart_image("leaf.webp", "image/webp", b"webp-bytes"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view: StateView = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(view.has_image);
    assert_eq!(view.image_name.as_deref(), Some("leaf.webp"));
    assert_eq!(view.phase, Phase::Idle);

    let response = app.oneshot(get("/image")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
    assert_eq!(body_bytes(response).await, b"webp-bytes");
}

#[tokio::test]
async fn image_is_not_found_before_upload() {
    let (app, _) = app_with(ScriptedModel::new(vec![]), LIMIT);
    let response = app.oneshot(get("/image")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_form_flow_redirects_back_to_results() {
    let model = ScriptedModel::new(vec![
        Ok("Symptoms: powdery mildew".to_string()),
        Ok("How often should fungicide be applied?".to_string()),
        Ok("Every 7 to 10 days".to_string()),
        Ok("Is sulphur safe?".to_string()),
    ]);
    let (app, state) = app_with(model.clone(), LIMIT);

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/identify",
            multipart_image("leaf.jpg", "image/jpeg", b"jpeg"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/#disease-detection");

    let html = String::from_utf8(body_bytes(app.clone().oneshot(get("/")).await.unwrap()).await)
        .unwrap();
    assert!(html.contains("<h4 class=\"result-heading\">Symptoms: powdery mildew</h4>"));
    assert!(html.contains("How often should fungicide be applied?"));

    let response = app
        .oneshot(form_request(
            "/ask",
            "question=How+often+should+fungicide+be+applied%3F",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let snapshot = state.pipeline.snapshot();
    assert_eq!(snapshot.result.as_deref(), Some("Every 7 to 10 days"));
    assert_eq!(snapshot.follow_up_questions, vec!["Is sulphur safe?"]);
    assert!(model.calls()[2][0]
        .as_text()
        .unwrap()
        .ends_with("\"How often should fungicide be applied?\""));
}

#[tokio::test]
async fn language_form_updates_state() {
    let (app, _) = app_with(ScriptedModel::new(vec![]), LIMIT);

    let response = app
        .clone()
        .oneshot(form_request("/language", "language=hindi"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.oneshot(get("/api/state")).await.unwrap();
    let view: StateView = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(view.language, "hindi");
    assert!(!view.pending);
}

#[tokio::test]
async fn api_ask_rejects_blank_question() {
    let (app, _) = app_with(ScriptedModel::new(vec![]), LIMIT);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ask")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"question":"  "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let model = ScriptedModel::new(vec![]);
    let (app, _) = app_with(model.clone(), 256);

    let response = app
        .oneshot(multipart_request(
            "/api/identify",
            multipart_image("big.jpg", "image/jpeg", &vec![0u8; 4096]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn health_check() {
    let (app, _) = app_with(ScriptedModel::new(vec![]), LIMIT);
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}
