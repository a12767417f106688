//! Tabular data codec.
//!
//! # Data Flow
//! ```text
//! input CSV file
//!     → reader.rs (header line → keys, one Row per data line)
//!     → Vec<Row> (asset content)
//!
//! fetched TransactionRecord
//!     → writer.rs (asset.data.content → header + value lines)
//!     → output CSV file
//! ```
//!
//! # Design Decisions
//! - Rows keep the column order they were read in
//! - Output header follows the key order of the first fetched row, which is
//!   the node's order and not necessarily the input order
//! - Values needing it are quoted on output instead of corrupting lines

use std::path::PathBuf;
use thiserror::Error;

pub mod reader;
pub mod writer;

pub use reader::read_table;
pub use writer::write_table;

/// One record: column name → value, in column order.
///
/// Values read from CSV are always JSON strings.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Errors raised while reading or writing tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to parse {} at line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Content is missing or incorrectly structured: {0}")]
    Structural(String),

    #[error("Content array is empty")]
    EmptyContent,

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;
