//! Sequential read → sign → submit → fetch → write pipeline.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::ledger::{self, Keypair, LedgerClient, LedgerResult, TransactionId};
use crate::observability::metrics;
use crate::pipeline::error::{PipelineError, Stage};
use crate::table;

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: Uuid,
    pub tx_id: TransactionId,
    pub rows_submitted: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
}

/// The pipeline bound to one ledger node and one output location.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: LedgerClient,
    output_path: PathBuf,
}

impl Pipeline {
    pub fn new(client: LedgerClient, output_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_path: output_path.into(),
        }
    }

    /// Build the pipeline described by a validated configuration.
    pub fn from_config(config: &AppConfig) -> LedgerResult<Self> {
        let client = LedgerClient::new(config.ledger.clone())?;
        Ok(Self::new(client, config.output.path.clone()))
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run the pipeline with a freshly generated signing identity.
    pub async fn run(&self, input: &Path) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", run_id = %run_id, input = %input.display());

        async {
            let started = Instant::now();
            let keypair = Keypair::generate();
            metrics::record_stage(Stage::KeyGeneration.as_str(), started, keypair.is_ok());

            let result = match keypair {
                Ok(keypair) => self.execute(run_id, input, &keypair).await,
                Err(e) => Err(PipelineError::ledger(Stage::KeyGeneration, e)),
            };
            finish(result)
        }
        .instrument(span)
        .await
    }

    /// Run the pipeline signing with a caller-supplied keypair.
    pub async fn run_with_keypair(
        &self,
        input: &Path,
        keypair: &Keypair,
    ) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", run_id = %run_id, input = %input.display());

        async { finish(self.execute(run_id, input, keypair).await) }
            .instrument(span)
            .await
    }

    async fn execute(
        &self,
        run_id: Uuid,
        input: &Path,
        keypair: &Keypair,
    ) -> Result<RunReport, PipelineError> {
        tracing::info!(owner = %keypair.public_key_base58(), "Pipeline run started");

        // 1. Read
        let started = Instant::now();
        let rows = observe(Stage::Read, started, table::read_table(input))
            .map_err(|e| PipelineError::table(Stage::Read, e))?;
        tracing::info!(rows = rows.len(), "Input table read");

        // 2. Build and sign
        let started = Instant::now();
        let tx = observe(Stage::Build, started, ledger::build_and_sign(rows, keypair))
            .map_err(|e| PipelineError::ledger(Stage::Build, e))?;
        let rows_submitted = tx.row_count();

        // 3. Submit
        let started = Instant::now();
        let tx_id = observe(Stage::Submit, started, self.client.submit_commit(&tx).await)
            .map_err(|e| PipelineError::ledger(Stage::Submit, e))?;
        tracing::info!(tx_id = %tx_id, "Transaction successfully posted");

        // 4. Fetch
        let started = Instant::now();
        let record = observe(Stage::Fetch, started, self.client.fetch_transaction(&tx_id).await)
            .map_err(|e| PipelineError::ledger(Stage::Fetch, e))?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            let pretty = serde_json::to_string_pretty(record.as_value()).unwrap_or_default();
            tracing::debug!(tx_id = %tx_id, record = %pretty, "Retrieved transaction");
        }

        // 5. Write
        let started = Instant::now();
        let rows_written = observe(
            Stage::Write,
            started,
            table::write_table(&record, &self.output_path),
        )
        .map_err(|e| PipelineError::table(Stage::Write, e))?;

        Ok(RunReport {
            run_id,
            tx_id,
            rows_submitted,
            rows_written,
            output_path: self.output_path.clone(),
        })
    }
}

fn observe<T, E>(stage: Stage, started: Instant, result: Result<T, E>) -> Result<T, E> {
    metrics::record_stage(stage.as_str(), started, result.is_ok());
    result
}

fn finish(result: Result<RunReport, PipelineError>) -> Result<RunReport, PipelineError> {
    match &result {
        Ok(report) => {
            metrics::record_run("success", report.rows_submitted);
            tracing::info!(
                tx_id = %report.tx_id,
                rows = report.rows_written,
                output = %report.output_path.display(),
                "Pipeline run completed"
            );
        }
        Err(e) => {
            metrics::record_run("failure", 0);
            tracing::error!(stage = %e.stage(), error = %e, "Pipeline run failed");
        }
    }
    result
}
