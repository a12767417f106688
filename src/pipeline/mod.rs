//! Pipeline orchestration.
//!
//! # Data Flow
//! ```text
//! run(input)
//!     → Keypair::generate        (key-generation)
//!     → table::read_table        (read)
//!     → ledger::build_and_sign   (build)
//!     → LedgerClient::submit     (submit)
//!     → LedgerClient::fetch      (fetch)
//!     → table::write_table       (write)
//! ```
//!
//! # Design Decisions
//! - Each stage starts only after the previous one completed
//! - The first failure aborts the run; nothing is retried
//! - The keypair is created per run and passed down explicitly

pub mod error;
pub mod orchestrator;

pub use error::{PipelineError, Stage};
pub use orchestrator::{Pipeline, RunReport};
