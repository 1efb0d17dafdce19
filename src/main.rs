use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Timelike, Utc};
use clap::Parser;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod ingest;
mod models;
mod projections;
mod sample;

#[cfg(test)]
mod test_support;

use config::AppConfig;
use error::AnalysisError;
use models::{AnalysisReport, ApiResponse, EventLog, TimeUnit};
use projections::AnalysisParams;

#[derive(Parser)]
#[command(name = "procmine-api")]
#[command(version, about = "Event log analysis API: bottlenecks, loops, variants, compliance", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

/// Stateless HTTP API
/// Every request analyses its own log; nothing survives the response
#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState {
        config: Arc::new(config),
    };

    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/analysis", post(analyze_upload))
        .route("/analysis/sample", get(analyze_sample))
        .route("/sample.csv", get(download_sample))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Process Mining API v0.1.0"
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Per-request overrides of the configured analysis settings
#[derive(Debug, Deserialize)]
struct AnalysisQuery {
    unit: Option<TimeUnit>,
    /// Comma-separated activity names
    reference: Option<String>,
    top: Option<usize>,
}

impl AnalysisQuery {
    /// Unwrap the extracted query, turning a bad parameter into a structured error
    fn from_request(query: Result<Query<Self>, QueryRejection>) -> Result<Self, AnalysisError> {
        query
            .map(|Query(query)| query)
            .map_err(|rejection| AnalysisError::InvalidParameter(rejection.body_text()))
    }

    fn params(&self, config: &AppConfig) -> (AnalysisParams, usize) {
        let mut params = config.analysis.params();
        if let Some(unit) = self.unit {
            params.time_unit = unit;
        }
        if let Some(reference) = &self.reference {
            params.reference_sequence = reference
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        (params, self.top.unwrap_or(config.analysis.top_variants))
    }
}

/// Error body returned to the client
struct ApiError(AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = if err.is_configuration() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };

        let mut details = serde_json::json!({ "kind": err.kind() });
        if let AnalysisError::MalformedRow { row, field, .. } = &err {
            details["row"] = serde_json::json!(row);
            details["field"] = serde_json::json!(field);
        }

        tracing::warn!(kind = err.kind(), error = %err, "analysis rejected");

        let body = ApiResponse {
            status: "error".to_string(),
            message: err.to_string(),
            data: Some(details),
        };
        (status, Json(body)).into_response()
    }
}

fn run(log: &EventLog, query: &AnalysisQuery, config: &AppConfig) -> Result<Json<AnalysisReport>, ApiError> {
    let (params, top) = query.params(config);
    let report = projections::analyze(log, &params, top)?;
    Ok(Json(report))
}

fn sample_log(config: &AppConfig) -> Result<EventLog, AnalysisError> {
    let now = Utc::now().naive_utc();
    let now = now.with_nanosecond(0).unwrap_or(now);
    let mut rng = rand::rng();
    sample::generate_sample_log(&mut rng, now, config.sample.cases)
}

/// Analyse an uploaded CSV event log (request body)
async fn analyze_upload(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<AnalysisReport>, ApiError> {
    let query = AnalysisQuery::from_request(query)?;
    let log = ingest::parse_csv(&body)?;
    run(&log, &query, &state.config)
}

/// Analyse a freshly generated sample log
async fn analyze_sample(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let query = AnalysisQuery::from_request(query)?;
    let log = sample_log(&state.config)?;
    run(&log, &query, &state.config)
}

/// Sample log as CSV, usable as an upload template
async fn download_sample(State(state): State<AppState>) -> Result<Response, ApiError> {
    let log = sample_log(&state.config)?;
    let csv = ingest::to_csv(&log)?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}
