//! JSON HTTP server for the FAQ bot and its admin triage surface.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/query` | Answer a query through the full pipeline |
//! | `GET`  | `/languages` | Supported language codes and names |
//! | `POST` | `/detect-language` | Heuristic language detection |
//! | `GET`  | `/corpus` | The FAQ corpus entries |
//! | `GET`  | `/admin/queries` | Triage records, optionally `?status=` filtered |
//! | `GET`  | `/admin/queries/published` | Resolved+published records (capped) |
//! | `POST` | `/admin/queries/{id}/resolve` | Resolve a record with a response |
//! | `GET`  | `/health` | Health check (version + cache size) |
//!
//! # Error Contract
//!
//! Error responses use a machine-readable code plus a human message:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Codes: `bad_request` (400), `not_found` (404), `internal` (500).
//! Translation-provider failures and triage-write failures never produce
//! an error response on `/query` — the pipeline degrades and still
//! answers with `success: true`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser clients can
//! call the API directly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::bridge::LanguageBridge;
use crate::config::Config;
use crate::corpus::{Corpus, CorpusEntry};
use crate::lang;
use crate::models::{QueryStatus, TriageRecord};
use crate::pipeline;
use crate::triage;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    corpus: Arc<Corpus>,
    bridge: Arc<LanguageBridge>,
}

/// Starts the HTTP server.
///
/// Loads the corpus, builds the language bridge, binds to `[server].bind`,
/// and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let corpus = Corpus::load(config)?;
    let corpus_len = corpus.len();

    let state = AppState {
        bridge: Arc::new(LanguageBridge::new(config)),
        corpus: Arc::new(corpus),
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/query", post(handle_query))
        .route("/languages", get(handle_languages))
        .route("/detect-language", post(handle_detect_language))
        .route("/corpus", get(handle_corpus))
        .route("/admin/queries", get(handle_list_queries))
        .route("/admin/queries/published", get(handle_list_published))
        .route("/admin/queries/{id}/resolve", post(handle_resolve))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!(
        "FAQ server listening on http://{} ({} corpus entries)",
        bind_addr, corpus_len
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Map operation errors to the most appropriate status code. Validation
/// and missing-id failures carry recognizable messages; anything else is
/// an opaque 500 with no internal detail leaked.
fn classify_error(err: anyhow::Error) -> AppError {
    let msg = err.to_string();

    if msg.contains("not found") {
        not_found(msg)
    } else if msg.contains("must not be empty") || msg.contains("invalid") {
        bad_request(msg)
    } else {
        eprintln!("Error: {}", err);
        internal("internal server error")
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    cache_entries: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_entries: state.bridge.cache_entries(),
    })
}

// ============ POST /query ============

#[derive(Deserialize)]
struct QueryRequest {
    query: Option<String>,
    language: Option<String>,
    #[serde(rename = "userEmail")]
    user_email: Option<String>,
}

/// Wire format kept camelCase for compatibility with existing clients.
#[derive(Serialize)]
struct QueryResponse {
    success: bool,
    answer: String,
    #[serde(rename = "originalAnswer")]
    original_answer: String,
    #[serde(rename = "matchedQuestion")]
    matched_question: Option<String>,
    language: String,
    #[serde(rename = "detectedLanguage")]
    detected_language: String,
    translated: bool,
}

async fn handle_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let query = req.query.as_deref().unwrap_or("");
    if query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let outcome = pipeline::answer_query(
        &state.config,
        &state.corpus,
        &state.bridge,
        query,
        req.language.as_deref(),
        req.user_email.as_deref(),
    )
    .await
    .map_err(classify_error)?;

    Ok(Json(QueryResponse {
        success: true,
        answer: outcome.answer,
        original_answer: outcome.original_answer,
        matched_question: outcome.matched_question,
        language: outcome.language,
        detected_language: outcome.detected_language,
        translated: outcome.translated,
    }))
}

// ============ GET /languages ============

#[derive(Serialize)]
struct LanguagesResponse {
    success: bool,
    languages: BTreeMap<String, String>,
}

async fn handle_languages() -> Json<LanguagesResponse> {
    let languages = lang::SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();
    Json(LanguagesResponse {
        success: true,
        languages,
    })
}

// ============ POST /detect-language ============

#[derive(Deserialize)]
struct DetectRequest {
    text: Option<String>,
}

#[derive(Serialize)]
struct DetectResponse {
    success: bool,
    language: String,
    #[serde(rename = "languageName")]
    language_name: String,
}

async fn handle_detect_language(
    State(state): State<AppState>,
    Json(req): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, AppError> {
    let text = req.text.as_deref().unwrap_or("");
    if text.trim().is_empty() {
        return Err(bad_request("text must not be empty"));
    }

    let language = state.bridge.detect_language(text);
    Ok(Json(DetectResponse {
        success: true,
        language: language.to_string(),
        language_name: lang::language_name(language).to_string(),
    }))
}

// ============ GET /corpus ============

#[derive(Serialize)]
struct CorpusResponse {
    success: bool,
    data: Vec<CorpusEntry>,
}

async fn handle_corpus(State(state): State<AppState>) -> Json<CorpusResponse> {
    Json(CorpusResponse {
        success: true,
        data: state.corpus.entries().to_vec(),
    })
}

// ============ Admin: triage records ============

#[derive(Deserialize)]
struct ListQueriesParams {
    status: Option<String>,
}

#[derive(Serialize)]
struct RecordsResponse {
    success: bool,
    items: Vec<TriageRecord>,
}

#[derive(Serialize)]
struct RecordResponse {
    success: bool,
    item: TriageRecord,
}

async fn handle_list_queries(
    State(state): State<AppState>,
    Query(params): Query<ListQueriesParams>,
) -> Result<Json<RecordsResponse>, AppError> {
    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(s) => Some(
            QueryStatus::parse(s)
                .ok_or_else(|| bad_request(format!("invalid status filter: {}", s)))?,
        ),
    };

    let items = triage::list(&state.config, status)
        .await
        .map_err(classify_error)?;
    Ok(Json(RecordsResponse {
        success: true,
        items,
    }))
}

async fn handle_list_published(
    State(state): State<AppState>,
) -> Result<Json<RecordsResponse>, AppError> {
    let items = triage::list_published(&state.config, None)
        .await
        .map_err(classify_error)?;
    Ok(Json(RecordsResponse {
        success: true,
        items,
    }))
}

#[derive(Deserialize)]
struct ResolveRequest {
    response: Option<String>,
}

async fn handle_resolve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<RecordResponse>, AppError> {
    let response_text = req.response.as_deref().unwrap_or("");

    let item = triage::resolve(&state.config, &id, response_text)
        .await
        .map_err(classify_error)?;
    Ok(Json(RecordResponse {
        success: true,
        item,
    }))
}
