use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use ledger_roundtrip::config::{load_or_default, ConfigOverrides};
use ledger_roundtrip::observability::{logging::init_logging, metrics};
use ledger_roundtrip::portal::PortalServer;

#[derive(Parser)]
#[command(name = "upload-portal")]
#[command(about = "Web front end that commits uploaded CSV files to the ledger", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
        ..ConfigOverrides::default()
    };
    let config = overrides.apply(load_or_default(cli.config.as_deref())?)?;

    init_logging(&config.observability.log_level);
    tracing::info!("upload-portal v{} starting", env!("CARGO_PKG_VERSION"));

    let metrics_handle = if config.observability.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    let listener = TcpListener::bind(&config.portal.bind_address).await?;
    let server = PortalServer::new(config, metrics_handle)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
