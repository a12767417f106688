//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ledger_roundtrip_stage_duration_seconds` (histogram): latency by stage
//! - `ledger_roundtrip_stage_failures_total` (counter): failures by stage
//! - `ledger_roundtrip_runs_total` (counter): runs by outcome
//! - `ledger_roundtrip_rows_submitted_total` (counter): rows committed

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

pub const STAGE_DURATION: &str = "ledger_roundtrip_stage_duration_seconds";
pub const STAGE_FAILURES: &str = "ledger_roundtrip_stage_failures_total";
pub const RUNS_TOTAL: &str = "ledger_roundtrip_runs_total";
pub const ROWS_SUBMITTED: &str = "ledger_roundtrip_rows_submitted_total";

/// Install the global Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record how long a stage took and whether it failed.
pub fn record_stage(stage: &'static str, started: Instant, ok: bool) {
    ::metrics::histogram!(STAGE_DURATION, "stage" => stage)
        .record(started.elapsed().as_secs_f64());
    if !ok {
        ::metrics::counter!(STAGE_FAILURES, "stage" => stage).increment(1);
    }
}

/// Record a finished run.
pub fn record_run(outcome: &'static str, rows: usize) {
    ::metrics::counter!(RUNS_TOTAL, "outcome" => outcome).increment(1);
    if rows > 0 {
        ::metrics::counter!(ROWS_SUBMITTED).increment(rows as u64);
    }
}
