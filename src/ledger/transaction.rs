//! Transaction building and signing.
//!
//! # Responsibilities
//! - Wrap table rows into the asset payload
//! - Attach submission metadata
//! - Lock the single output to the submitter's public key
//! - Sign the input and derive the transaction id

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ledger::canonical::{sha3_digest, to_canonical_string};
use crate::ledger::condition::{Condition, Ed25519Fulfillment};
use crate::ledger::keypair::Keypair;
use crate::ledger::types::{LedgerError, LedgerResult, TransactionId};
use crate::table::Row;

/// Tag stored in the asset payload's `type` field.
pub const ASSET_TYPE: &str = "financial_data";

const TX_VERSION: &str = "2.0";
const OPERATION_CREATE: &str = "CREATE";

/// Domain data carried by the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub data: AssetPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// ISO-8601 submission time.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub owners_before: Vec<String>,
    /// Always null for CREATE transactions.
    pub fulfills: Option<Value>,
    pub fulfillment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub condition: Condition,
    pub public_keys: Vec<String>,
    pub amount: String,
}

/// A CREATE transaction in the node's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    pub version: String,
    pub operation: String,
    pub asset: Asset,
    pub metadata: Metadata,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl Transaction {
    /// Assemble an unsigned CREATE transaction owned by `keypair`.
    pub fn create(rows: Vec<Row>, keypair: &Keypair, timestamp: DateTime<Utc>) -> Self {
        let owner = keypair.public_key_base58();

        Self {
            id: None,
            version: TX_VERSION.to_string(),
            operation: OPERATION_CREATE.to_string(),
            asset: Asset {
                data: AssetPayload {
                    kind: ASSET_TYPE.to_string(),
                    content: rows,
                },
            },
            metadata: Metadata {
                date: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            inputs: vec![Input {
                owners_before: vec![owner.clone()],
                fulfills: None,
                fulfillment: None,
            }],
            outputs: vec![Output {
                condition: Condition::ed25519(&keypair.public_key()),
                public_keys: vec![owner],
                amount: "1".to_string(),
            }],
        }
    }

    fn to_value(&self) -> LedgerResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| LedgerError::Build(format!("asset serialization failed: {}", e)))
    }

    /// Digest every input signs: the body with `id` and fulfillments nulled.
    fn signing_digest(&self) -> LedgerResult<[u8; 32]> {
        let mut unsigned = self.clone();
        unsigned.id = None;
        for input in &mut unsigned.inputs {
            input.fulfillment = None;
        }
        sha3_digest(&unsigned.to_value()?)
    }

    /// Id of the body: the digest with `id` nulled and fulfillments kept.
    fn compute_id(&self) -> LedgerResult<TransactionId> {
        let mut body = self.clone();
        body.id = None;
        Ok(TransactionId(hex::encode(sha3_digest(&body.to_value()?)?)))
    }

    /// Sign every input with `keypair` and assign the id.
    pub fn sign(mut self, keypair: &Keypair) -> LedgerResult<SignedTransaction> {
        let digest = self.signing_digest()?;
        let fulfillment = Ed25519Fulfillment::new(keypair.public_key(), keypair.sign(&digest));

        for input in &mut self.inputs {
            input.fulfillment = Some(fulfillment.to_uri());
        }

        let id = self.compute_id()?;
        self.id = Some(id.0.clone());

        Ok(SignedTransaction { id, tx: self })
    }
}

/// A signed transaction, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    id: TransactionId,
    tx: Transaction,
}

impl SignedTransaction {
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// Number of rows carried in the asset payload.
    pub fn row_count(&self) -> usize {
        self.tx.asset.data.content.len()
    }

    /// JSON body in canonical key order, as posted to the node.
    pub fn to_json(&self) -> LedgerResult<Value> {
        let canonical = to_canonical_string(&self.tx.to_value()?)?;
        serde_json::from_str(&canonical)
            .map_err(|e| LedgerError::Build(format!("canonical body is not JSON: {}", e)))
    }

    /// Check every fulfillment against its owner and the id against the body.
    pub fn verify(&self) -> LedgerResult<bool> {
        verify_transaction(&self.tx)
    }
}

/// Verify a transaction received in wire form.
pub fn verify_json(value: &Value) -> LedgerResult<bool> {
    let tx: Transaction = serde_json::from_value(value.clone())
        .map_err(|e| LedgerError::Decode(format!("not a CREATE transaction: {}", e)))?;
    verify_transaction(&tx)
}

fn verify_transaction(tx: &Transaction) -> LedgerResult<bool> {
    let digest = tx.signing_digest()?;

    for input in &tx.inputs {
        let Some(uri) = input.fulfillment.as_deref() else {
            return Ok(false);
        };
        let fulfillment = Ed25519Fulfillment::from_uri(uri)?;
        let owner = bs58::encode(fulfillment.public_key.as_bytes()).into_string();
        if !input.owners_before.contains(&owner) || !fulfillment.validate(&digest) {
            return Ok(false);
        }
    }

    let expected = tx.compute_id()?;
    Ok(tx.id.as_deref() == Some(expected.as_str()))
}

/// Build and sign the run's transaction, stamped with the current time.
pub fn build_and_sign(rows: Vec<Row>, keypair: &Keypair) -> LedgerResult<SignedTransaction> {
    build_and_sign_at(rows, keypair, Utc::now())
}

/// Build and sign with an explicit timestamp.
pub fn build_and_sign_at(
    rows: Vec<Row>,
    keypair: &Keypair,
    timestamp: DateTime<Utc>,
) -> LedgerResult<SignedTransaction> {
    let signed = Transaction::create(rows, keypair, timestamp).sign(keypair)?;

    tracing::debug!(
        tx_id = %signed.id(),
        rows = signed.row_count(),
        owner = %keypair.public_key_base58(),
        "Transaction signed"
    );

    Ok(signed)
}
