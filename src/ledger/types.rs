//! Ledger-specific types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// Re-export LedgerConfig from config module to avoid duplication
pub use crate::config::schema::LedgerConfig;

/// Identifier the ledger assigns to a committed transaction.
///
/// Lowercase hex of the SHA3-256 digest of the signed transaction body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A transaction as served back by the node's query endpoint.
///
/// Kept as raw JSON: the node decides the shape and key order.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord(pub Value);

impl TransactionRecord {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `id` field, when present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The `asset.data.content` array, when structurally present.
    pub fn content(&self) -> Option<&Vec<Value>> {
        self.0
            .get("asset")
            .and_then(|asset| asset.get("data"))
            .and_then(|data| data.get("content"))
            .and_then(Value::as_array)
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Mnemonic, seed or key derivation failed.
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Transaction could not be assembled or serialized.
    #[error("Failed to build transaction: {0}")]
    Build(String),

    /// Transport-level failure talking to the node.
    #[error("Network error: {0}")]
    Network(String),

    /// The node did not answer within the configured deadline.
    #[error("Ledger request timed out after {0} seconds")]
    Timeout(u64),

    /// The node refused the transaction.
    #[error("Transaction rejected by node (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The node has no transaction with this id.
    #[error("Transaction {0} not found")]
    NotFound(TransactionId),

    /// The node answered with something we cannot interpret.
    #[error("Unexpected response from node: {0}")]
    Decode(String),

    /// The configured base URL cannot be used to build endpoints.
    #[error("Invalid ledger endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
