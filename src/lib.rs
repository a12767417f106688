//! Commit CSV tables to a ledger node and read them back.

pub mod config;
pub mod ledger;
pub mod observability;
pub mod pipeline;
pub mod portal;
pub mod table;

pub use config::AppConfig;
pub use ledger::{Keypair, LedgerClient};
pub use pipeline::{Pipeline, PipelineError, RunReport, Stage};
