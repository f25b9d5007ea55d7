//! HTTP surface: the page, its form posts, and a JSON API over the same pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::error::PipelineError;
use crate::image_payload::UploadedImage;
use crate::model::{GeminiClient, GenerativeModel};
use crate::page::{render_page, PageContext};
use crate::pipeline::{AnalysisResult, DiseaseInquiryPipeline};
use crate::state::{Phase, PipelineState};
use crate::theme::Theme;

const RESULT_ANCHOR: &str = "/#disease-detection";

pub struct AppState {
    pub pipeline: DiseaseInquiryPipeline,
    pub theme: Theme,
}

impl AppState {
    pub fn new(model: Arc<dyn GenerativeModel>, language: &str, theme: Theme) -> Self {
        Self {
            pipeline: DiseaseInquiryPipeline::new(model, language),
            theme,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub result: String,
    pub succeeded: bool,
    pub follow_up_questions: Vec<String>,
    pub model: String,
    pub processing_time_ms: u128,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateView {
    pub phase: Phase,
    pub pending: bool,
    pub has_image: bool,
    pub image_name: Option<String>,
    pub result: Option<String>,
    pub follow_up_questions: Vec<String>,
    pub language: String,
}

impl From<&PipelineState> for StateView {
    fn from(state: &PipelineState) -> Self {
        Self {
            phase: state.phase,
            pending: state.pending,
            has_image: state.has_image(),
            image_name: state.image.as_ref().map(|image| image.file_name.clone()),
            result: state.result.clone(),
            follow_up_questions: state.follow_up_questions.clone(),
            language: state.language.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors returned by the JSON API.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(PipelineError),
    Multipart(MultipartError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

fn pipeline_status(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Busy => StatusCode::CONFLICT,
        PipelineError::NoImage | PipelineError::EmptyQuestion => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Pipeline(err) => (pipeline_status(&err), err.to_string()),
            ApiError::Multipart(err) => (err.status(), err.body_text()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Read the `image` field of a multipart body. An empty file part (the
/// browser's "no file chosen") counts as no image.
async fn read_image(multipart: &mut Multipart) -> Result<Option<UploadedImage>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        if data.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadedImage::new(
            file_name,
            content_type.as_deref(),
            data,
        )));
    }
    Ok(None)
}

fn analysis_response(
    state: &AppState,
    result: AnalysisResult,
    start: Instant,
) -> Json<AnalysisResponse> {
    let snapshot = state.pipeline.snapshot();
    Json(AnalysisResponse {
        result: result.text,
        succeeded: result.succeeded,
        follow_up_questions: snapshot.follow_up_questions,
        model: state.pipeline.model_name().to_string(),
        processing_time_ms: start.elapsed().as_millis(),
    })
}

/// HTML routes redirect back to the page; only an overlapping request is an error.
fn page_outcome<T>(result: Result<T, PipelineError>) -> Response {
    match result {
        Ok(_) => Redirect::to(RESULT_ANCHOR).into_response(),
        Err(PipelineError::Busy) => (
            StatusCode::CONFLICT,
            Html(format!(
                "<p>{}. <a href=\"{}\">Back</a></p>",
                PipelineError::Busy,
                RESULT_ANCHOR
            )),
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "Request ignored");
            Redirect::to(RESULT_ANCHOR).into_response()
        }
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.pipeline.snapshot();
    Html(render_page(&PageContext {
        state: &snapshot,
        theme: state.theme,
        model_name: state.pipeline.model_name(),
        year: chrono::Local::now().year(),
    }))
}

async fn identify(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let image = match read_image(&mut multipart).await {
        Ok(image) => image,
        Err(err) => return ApiError::from(err).into_response(),
    };
    if let Some(image) = image {
        if let Err(err) = state.pipeline.select_image(image) {
            return page_outcome::<()>(Err(err));
        }
    }
    page_outcome(state.pipeline.analyze(None).await)
}

async fn ask(State(state): State<Arc<AppState>>, Form(form): Form<QuestionForm>) -> Response {
    page_outcome(state.pipeline.reinvoke_with_question(&form.question).await)
}

async fn select_language(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LanguageForm>,
) -> Redirect {
    state.pipeline.select_language(form.language.trim());
    Redirect::to(RESULT_ANCHOR)
}

async fn current_image(State(state): State<Arc<AppState>>) -> Response {
    match state.pipeline.snapshot().image {
        Some(image) => ([(header::CONTENT_TYPE, image.mime_type)], image.data).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn api_select_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<StateView>, ApiError> {
    let image = read_image(&mut multipart)
        .await?
        .ok_or(PipelineError::NoImage)?;
    state.pipeline.select_image(image)?;
    Ok(Json(StateView::from(&state.pipeline.snapshot())))
}

async fn api_identify(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let start = Instant::now();
    if let Some(image) = read_image(&mut multipart).await? {
        state.pipeline.select_image(image)?;
    }
    let result = state.pipeline.analyze(None).await?;
    Ok(analysis_response(&state, result, start))
}

async fn api_ask(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuestionForm>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let start = Instant::now();
    let result = state.pipeline.reinvoke_with_question(&body.question).await?;
    Ok(analysis_response(&state, result, start))
}

async fn api_state(State(state): State<Arc<AppState>>) -> Json<StateView> {
    Json(StateView::from(&state.pipeline.snapshot()))
}

async fn health() -> &'static str {
    "ok"
}

pub fn build_app(state: Arc<AppState>, max_upload_bytes: usize, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/identify", post(identify))
        .route("/ask", post(ask))
        .route("/language", post(select_language))
        .route("/image", get(current_image))
        .route("/api/image", post(api_select_image))
        .route("/api/identify", post(api_identify))
        .route("/api/ask", post(api_ask))
        .route("/api/state", get(api_state))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn serve(config: SiteConfig) -> anyhow::Result<()> {
    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; analysis requests will fail until it is");
    }

    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::from_config(&config));
    let state = Arc::new(AppState::new(model, &config.language, config.theme));
    let app = build_app(state, config.max_upload_bytes, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %listener.local_addr()?,
        model = %config.model,
        theme = %config.theme,
        "Server running"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
