use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Declared MIME type of a Word document upload.
const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let config = Config::from_env()?;
    let max_upload_bytes = config.max_upload_bytes;

    let state = AppState { config };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/extract", post(extract))
        .layer(DefaultBodyLimit::max(max_upload_bytes + UPLOAD_OVERHEAD))
        .with_state(state.clone())
        .layer(cors);

    let addr: SocketAddr = state
        .config
        .bind_addr
        .parse()
        .map_err(|err| AppError::Config(format!("Invalid bind addr: {err}")))?;
    info!("redline server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::Config(format!("Bind error: {err}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|err| AppError::Config(format!("Server error: {err}")))?;

    Ok(())
}

/// Multipart framing allowance on top of the configured file-size limit.
const UPLOAD_OVERHEAD: usize = 16 * 1024;

#[derive(Clone)]
struct AppState {
    config: Config,
}

#[derive(Debug, Clone)]
struct Config {
    bind_addr: String,
    /// Shared secret; `None` disables the check entirely.
    api_key: Option<String>,
    max_upload_bytes: usize,
}

impl Config {
    fn from_env() -> Result<Self, AppError> {
        let bind_addr = env_or("REDLINE_BIND", "0.0.0.0:8080");
        let api_key = std::env::var("REDLINE_API_KEY").ok().filter(|k| !k.is_empty());
        let max_upload_mb = env_or_int("REDLINE_MAX_UPLOAD_MB", 10)?;
        if max_upload_mb <= 0 {
            return Err(AppError::Config(
                "REDLINE_MAX_UPLOAD_MB must be positive".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            api_key,
            max_upload_bytes: max_upload_mb as usize * 1024 * 1024,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AuthQuery {
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExtractResponse {
    summary: redline::Summary,
    result: redline::ExtractionResult,
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn extract(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state.config, &headers, &query)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Invalid upload: {err}")))?
    {
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("Invalid upload: {err}")))?;
        upload = Some((filename, content_type, data));
        break;
    }

    let Some((filename, content_type, data)) = upload else {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    };

    if !is_docx_upload(&filename, content_type.as_deref()) {
        return Err(AppError::BadRequest(
            "Only .docx uploads are supported".to_string(),
        ));
    }

    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "Upload exceeds the {} byte limit",
            state.config.max_upload_bytes
        )));
    }

    let result = redline::extract_bytes(&data)?;
    let summary = result.summary();
    info!(
        "extracted {}: {} insertions, {} deletions, {} moves, {} comments",
        filename, summary.insertions, summary.deletions, summary.moves, summary.comments
    );

    Ok(Json(ExtractResponse { summary, result }))
}

fn authorize(config: &Config, headers: &HeaderMap, query: &AuthQuery) -> Result<(), AppError> {
    let Some(expected) = config.api_key.as_ref() else {
        return Ok(());
    };

    let header_key = headers.get("x-api-key").and_then(|value| value.to_str().ok());
    if header_key == Some(expected.as_str()) {
        return Ok(());
    }
    if query.api_key.as_deref() == Some(expected.as_str()) {
        return Ok(());
    }

    Err(AppError::Auth)
}

fn is_docx_upload(filename: &str, content_type: Option<&str>) -> bool {
    content_type == Some(DOCX_MIME) || filename.to_lowercase().ends_with(".docx")
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_int(key: &str, default: i64) -> Result<i64, AppError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<i64>()
            .map_err(|_| AppError::Config(format!("Invalid integer for {key}"))),
        Err(_) => Ok(default),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

#[derive(Debug, Error)]
enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid or missing API key")]
    Auth,
    #[error(transparent)]
    Extraction(#[from] redline::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Auth => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Extraction(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        tracing::error!("request error: {}", message);
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
