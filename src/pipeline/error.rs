//! Stage-tagged pipeline errors.

use std::fmt;
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::table::TableError;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    KeyGeneration,
    Read,
    Build,
    Submit,
    Fetch,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::KeyGeneration => "key-generation",
            Stage::Read => "read",
            Stage::Build => "build",
            Stage::Submit => "submit",
            Stage::Fetch => "fetch",
            Stage::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed run: which stage broke and why.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Ledger { stage: Stage, source: LedgerError },

    #[error("{stage} stage failed: {source}")]
    Table { stage: Stage, source: TableError },
}

impl PipelineError {
    pub fn ledger(stage: Stage, source: LedgerError) -> Self {
        Self::Ledger { stage, source }
    }

    pub fn table(stage: Stage, source: TableError) -> Self {
        Self::Table { stage, source }
    }

    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Ledger { stage, .. } | Self::Table { stage, .. } => *stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_names_stage_and_cause() {
        let err = PipelineError::table(Stage::Read, TableError::FileNotFound(PathBuf::from("in.csv")));
        assert_eq!(err.to_string(), "read stage failed: Input file not found: in.csv");
        assert_eq!(err.stage(), Stage::Read);

        let err = PipelineError::ledger(Stage::Submit, LedgerError::Network("connection refused".into()));
        assert_eq!(err.stage(), Stage::Submit);
        assert!(err.to_string().starts_with("submit stage failed: Network error"));
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error;
        let err = PipelineError::table(Stage::Write, TableError::EmptyContent);
        assert_eq!(err.source().unwrap().to_string(), "Content array is empty");
    }
}
