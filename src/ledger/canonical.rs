//! Canonical JSON serialization and hashing.
//!
//! The node recomputes transaction ids and signature messages from the
//! canonical form: object keys sorted recursively, no insignificant
//! whitespace, non-ASCII characters left unescaped.

use serde_json::{Map, Value};
use sha3::{Digest, Sha3_256};

use crate::ledger::types::{LedgerError, LedgerResult};

/// Return a copy of `value` whose objects iterate in sorted key order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Serialize `value` in canonical form.
pub fn to_canonical_string(value: &Value) -> LedgerResult<String> {
    serde_json::to_string(&canonicalize(value))
        .map_err(|e| LedgerError::Build(format!("canonical serialization failed: {}", e)))
}

/// SHA3-256 digest of the canonical form.
pub fn sha3_digest(value: &Value) -> LedgerResult<[u8; 32]> {
    let serialized = to_canonical_string(value)?;
    Ok(Sha3_256::digest(serialized.as_bytes()).into())
}
