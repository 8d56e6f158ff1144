//! HTTP front-end for the transcriber.
//!
//! Endpoints:
//! - `POST /transcribe`: `{ "text", "accent", "useWeakForms", "ignoreStress" }`
//!   → `{ "text", "accent", "ipa", "display" }`
//! - `GET /ipa?word=…&accent=…`: citation form of one word
//! - `GET /accents`: supported accents
//! - `GET /health`: returns `"ok"`
//!
//! Usage:
//!   cargo run --features server --bin ipa-server -- --port 8002 --g2p-table /path/to/g2p_en.tsv
//!
//! Every flag can also be set from the environment (`SERVER_HOST`,
//! `SERVER_PORT`, `IPA_G2P_TABLE`, `CORS_ORIGINS`).

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use ipa_transcribe::{
    notation::strip_stress, Accent, FallbackG2p, PhoneticDictionary, TranscribeError, Transcriber,
};

// ─────────────────────────────────────────────────────────────────────────────
// CLI / configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "ipa-server", about = "English → IPA transcription server")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "SERVER_PORT", default_value_t = 8002)]
    port: u16,

    /// G2P table for words missing from the dictionary.
    #[arg(long, env = "IPA_G2P_TABLE")]
    g2p_table: Option<PathBuf>,

    /// Comma-separated allowed CORS origins.  Any origin when unset.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

fn default_accent() -> String {
    Accent::American.code().to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranscribeRequest {
    text: String,
    #[serde(default = "default_accent")]
    accent: String,
    #[serde(default = "default_true")]
    use_weak_forms: bool,
    #[serde(default)]
    ignore_stress: bool,
}

#[derive(Debug, Serialize)]
struct TranscribeResponse {
    text: String,
    accent: Accent,
    ipa: String,
    /// `ipa` with the accent's display convention applied.
    display: String,
}

#[derive(Debug, Deserialize)]
struct IpaQuery {
    word: String,
    #[serde(default = "default_accent")]
    accent: String,
}

#[derive(Debug, Serialize)]
struct IpaResponse {
    word: String,
    accent: Accent,
    ipa: String,
}

#[derive(Debug, Serialize)]
struct AccentInfo {
    code: &'static str,
    description: &'static str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

struct ApiError(TranscribeError);

impl From<TranscribeError> for ApiError {
    fn from(e: TranscribeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            TranscribeError::UnsupportedAccent { .. } => StatusCode::BAD_REQUEST,
            TranscribeError::Transcription { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

type AppState = Arc<Transcriber>;

async fn transcribe(
    State(t): State<AppState>,
    Json(req): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let accent: Accent = req.accent.parse()?;
    let mut ipa = t.transcribe_with(&req.text, accent, req.use_weak_forms)?;
    if req.ignore_stress {
        ipa = strip_stress(&ipa);
    }
    let display = accent.present(&ipa);
    Ok(Json(TranscribeResponse { text: req.text, accent, ipa, display }))
}

async fn ipa(
    State(t): State<AppState>,
    Query(q): Query<IpaQuery>,
) -> Result<Json<IpaResponse>, ApiError> {
    let accent: Accent = q.accent.parse()?;
    let ipa = t.lookup_word(&q.word, accent)?;
    Ok(Json(IpaResponse { word: q.word, accent, ipa }))
}

async fn accents() -> Json<Vec<AccentInfo>> {
    Json(
        Accent::ALL
            .iter()
            .map(|a| AccentInfo { code: a.code(), description: a.description() })
            .collect(),
    )
}

async fn health() -> &'static str {
    "ok"
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/ipa", get(ipa))
        .route("/accents", get(accents))
        .route("/health", get(health))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o.trim()).with_context(|| format!("Invalid CORS origin '{}'", o))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }
    tracing::info!("Shutting down");
}

// ─────────────────────────────────────────────────────────────────────────────
// main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let g2p = match &args.g2p_table {
        Some(path) => FallbackG2p::from_path(path),
        None => FallbackG2p::from_default_location(),
    };
    if g2p.preload() {
        tracing::info!("G2P fallback table loaded");
    }
    let transcriber = Transcriber::new(
        PhoneticDictionary::shared(),
        Arc::new(g2p),
    );

    let app = router(Arc::new(transcriber))
        .layer(cors_layer(&args.cors_origins)?)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
