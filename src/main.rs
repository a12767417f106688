//! ledger-roundtrip
//!
//! Reads a CSV file, commits its rows to a ledger node as one signed
//! transaction, fetches the committed transaction back and writes its
//! content to the configured output file.
//!
//! ```text
//!   input.csv ──▶ read ──▶ build + sign ──▶ submit ──▶ ┌─────────────┐
//!                                                      │ ledger node │
//!   output.csv ◀── write ◀──────────── fetch ◀──────── └─────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use ledger_roundtrip::config::{load_or_default, ConfigOverrides};
use ledger_roundtrip::observability::logging::init_logging;
use ledger_roundtrip::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "ledger-roundtrip")]
#[command(about = "Commit a CSV table to a ledger node and write the committed copy back", long_about = None)]
struct Cli {
    /// CSV file to submit (header line first)
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the retrieved table (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ledger node API base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        api_url: cli.api_url,
        output: cli.output,
        bind_address: None,
    };
    let config = match load_or_default(cli.config.as_deref()).and_then(|c| overrides.apply(c)) {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability.log_level);

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize ledger client");
            return ExitCode::FAILURE;
        }
    };

    // Failures are logged with their stage by the pipeline itself.
    match pipeline.run(&cli.input).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
