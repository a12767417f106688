//! Portal HTTP server setup.
//!
//! # Responsibilities
//! - Create upload and output directories
//! - Wire the router to a bound listener
//! - Shut down gracefully on Ctrl+C

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs;
use std::io;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::ledger::LedgerResult;
use crate::pipeline::Pipeline;
use crate::portal::{build_router, PortalState};

/// HTTP server for the upload portal.
pub struct PortalServer {
    router: Router,
    config: AppConfig,
}

impl PortalServer {
    /// Create a new server with the given configuration.
    pub fn new(config: AppConfig, metrics: Option<PrometheusHandle>) -> LedgerResult<Self> {
        let pipeline = Pipeline::from_config(&config)?;
        let state = PortalState::new(pipeline, &config.portal, metrics);
        let router = build_router(state, config.portal.max_upload_bytes);

        Ok(Self { router, config })
    }

    /// Create the directories uploads and results are written to.
    pub fn prepare_directories(&self) -> io::Result<()> {
        fs::create_dir_all(&self.config.portal.upload_dir)?;
        if let Some(parent) = self.config.output.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> io::Result<()> {
        self.prepare_directories()?;

        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upload_dir = %self.config.portal.upload_dir.display(),
            output = %self.config.output.path.display(),
            "Upload portal starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Upload portal stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
