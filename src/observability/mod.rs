//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (per-stage counters and latency histograms)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG or configured level)
//!     → portal `/metrics` endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every log line of a pipeline run carries its run id
//! - Metrics are recorded unconditionally; without an installed recorder
//!   they are no-ops

pub mod logging;
pub mod metrics;
