//! Upload portal.
//!
//! # Data Flow
//! ```text
//! browser
//!     → GET  /              upload form
//!     → POST /upload        store file → Pipeline::run → 303 /transactions
//!     → GET  /transactions  retrieved CSV rendered as a table
//!     → GET  /dashboard     redirect to the external dashboard
//!     → GET  /health, /metrics
//! ```

pub mod handlers;
pub mod render;
pub mod server;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::config::PortalConfig;
use crate::pipeline::Pipeline;

pub use server::PortalServer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct PortalState {
    pub pipeline: Arc<Pipeline>,
    pub upload_dir: Arc<PathBuf>,
    pub dashboard_url: Option<Arc<str>>,
    /// Serializes pipeline runs.
    pub run_lock: Arc<Mutex<()>>,
    pub metrics: Option<PrometheusHandle>,
}

impl PortalState {
    pub fn new(pipeline: Pipeline, config: &PortalConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            upload_dir: Arc::new(config.upload_dir.clone()),
            dashboard_url: config.dashboard_url.as_deref().map(Arc::from),
            run_lock: Arc::new(Mutex::new(())),
            metrics,
        }
    }
}

/// Build the portal router with its middleware layers.
pub fn build_router(state: PortalState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .route("/transactions", get(handlers::transactions))
        .route("/dashboard", get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
