//! SafeDrive Dashboard Server
//!
//! HTTP surface for the fatigue dashboard UI: live monitoring controls and
//! snapshots, historical range queries, health, and Prometheus metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, MethodRouter},
    Json, Router,
};
use dms::Classifier;
use history_query::HistoryPipeline;
use live_sampler::{LiveSampler, SamplerPhase};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;

pub use config::{DashboardConfig, LoggingConfig, ServerConfig};
pub use error::{ApiError, AppError, ErrorBody};
pub use rate_limit::{create_governor_config, RateLimitConfig};
pub use routes::history::{HistoryQuery, HistoryQueryResponse};
pub use routes::live::LiveControlResponse;

/// Application state shared across handlers
pub struct AppState {
    pub sampler: LiveSampler,
    pub history: HistoryPipeline,
    /// Historical service URL reported by the health check
    pub history_endpoint: String,
    pub version: String,
    pub start_time: Instant,
    /// Present when a Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build both pipelines from configuration
    pub fn new(config: &DashboardConfig) -> Result<Self, ApiError> {
        let classifier = Classifier::new(config.classifier.clone())?;
        let sampler = LiveSampler::new(config.sampler.clone(), classifier);
        let history = HistoryPipeline::from_config(&config.history)?;
        Ok(Self::with_parts(sampler, history, config.history.endpoint.clone()))
    }

    pub fn with_parts(sampler: LiveSampler, history: HistoryPipeline, history_endpoint: String) -> Self {
        Self {
            sampler,
            history,
            history_endpoint,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub live: LiveHealth,
    pub history: HistoryHealth,
}

#[derive(Debug, Serialize)]
pub struct LiveHealth {
    pub phase: SamplerPhase,
    pub samples_produced: u64,
}

#[derive(Debug, Serialize)]
pub struct HistoryHealth {
    pub configured: bool,
    pub endpoint: String,
    pub loading: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, rate_limit: &RateLimitConfig) -> Router {
    let mut history_query: MethodRouter<Arc<AppState>> = post(routes::history::query);
    if let Some(governor) = create_governor_config(rate_limit) {
        info!(
            "Rate limiting history queries: burst {}, one per {}s",
            rate_limit.burst_size, rate_limit.per_second
        );
        history_query = history_query.layer(GovernorLayer { config: governor });
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/live", get(routes::live::get_live))
        .route("/api/v1/live/start", post(routes::live::start))
        .route("/api/v1/live/stop", post(routes::live::stop))
        .route(
            "/api/v1/history",
            get(routes::history::get_view)
                .delete(routes::history::reset)
                .merge(history_query),
        )
        .route("/api/v1/history/default-range", get(routes::history::default_range))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let snapshot = state.sampler.snapshot();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        live: LiveHealth {
            phase: snapshot.phase,
            samples_produced: snapshot.samples_produced,
        },
        history: HistoryHealth {
            configured: !state.history_endpoint.trim().is_empty(),
            endpoint: state.history_endpoint.clone(),
            loading: state.history.is_loading(),
        },
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides `config.level`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ApiError::Logging(format!("invalid log filter: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ApiError::Logging(e.to_string()))
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ApiError> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(())
}

/// Run the dashboard server until ctrl-c
pub async fn run_server(config: DashboardConfig) -> Result<(), ApiError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Metrics(e.to_string()))?;

    let state = Arc::new(AppState::new(&config)?.with_metrics(handle));
    let app = create_router(state.clone(), &config.rate_limit);

    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    info!("Dashboard server listening on {}", listener.local_addr()?);

    serve(listener, app, shutdown_signal()).await?;

    state.sampler.stop();
    info!("Dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
