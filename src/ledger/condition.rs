//! Ed25519-SHA-256 crypto-conditions.
//!
//! Outputs are locked with a single-signature condition and inputs carry the
//! matching fulfillment, both in the encodings the node validates:
//!
//! ```text
//! fulfillment DER   A4 64 | 80 20 <public key> | 81 40 <signature>
//! fingerprint DER   30 22 | 80 20 <public key>
//! condition URI     ni:///sha-256;<b64url(sha256(fingerprint))>?fpt=ed25519-sha-256&cost=131072
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ledger::types::{LedgerError, LedgerResult};

/// Condition type name as it appears in output details and URIs.
pub const ED25519_SHA256: &str = "ed25519-sha-256";

/// Fixed cost of an ed25519-sha-256 condition.
pub const ED25519_COST: u64 = 131_072;

const FULFILLMENT_TAG: u8 = 0xA4;
const FULFILLMENT_LEN: usize = 2 + 2 + 32 + 2 + 64;

/// Output condition bound to one public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub details: ConditionDetails,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub public_key: String,
}

impl Condition {
    /// Single-signature condition satisfied by `public_key`.
    pub fn ed25519(public_key: &VerifyingKey) -> Self {
        Self {
            details: ConditionDetails {
                kind: ED25519_SHA256.to_string(),
                public_key: bs58::encode(public_key.as_bytes()).into_string(),
            },
            uri: condition_uri(public_key),
        }
    }
}

/// Condition URI for an ed25519-sha-256 condition over `public_key`.
pub fn condition_uri(public_key: &VerifyingKey) -> String {
    let mut fingerprint_contents = Vec::with_capacity(36);
    fingerprint_contents.extend_from_slice(&[0x30, 0x22, 0x80, 0x20]);
    fingerprint_contents.extend_from_slice(public_key.as_bytes());

    let fingerprint = Sha256::digest(&fingerprint_contents);
    format!(
        "ni:///sha-256;{}?fpt={}&cost={}",
        URL_SAFE_NO_PAD.encode(fingerprint),
        ED25519_SHA256,
        ED25519_COST
    )
}

/// A signature together with the key it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Fulfillment {
    pub public_key: VerifyingKey,
    pub signature: Signature,
}

impl Ed25519Fulfillment {
    pub fn new(public_key: VerifyingKey, signature: Signature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// DER encoding of the fulfillment.
    pub fn to_der(&self) -> Vec<u8> {
        let mut der = Vec::with_capacity(FULFILLMENT_LEN);
        der.extend_from_slice(&[FULFILLMENT_TAG, (FULFILLMENT_LEN - 2) as u8]);
        der.extend_from_slice(&[0x80, 0x20]);
        der.extend_from_slice(self.public_key.as_bytes());
        der.extend_from_slice(&[0x81, 0x40]);
        der.extend_from_slice(&self.signature.to_bytes());
        der
    }

    /// Fulfillment URI (base64url DER, no padding) stored in the input.
    pub fn to_uri(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_der())
    }

    /// Parse a fulfillment URI produced by [`Ed25519Fulfillment::to_uri`].
    pub fn from_uri(uri: &str) -> LedgerResult<Self> {
        let der = URL_SAFE_NO_PAD
            .decode(uri)
            .map_err(|e| LedgerError::Decode(format!("fulfillment is not base64url: {}", e)))?;

        if der.len() != FULFILLMENT_LEN
            || der[0] != FULFILLMENT_TAG
            || der[1] as usize != FULFILLMENT_LEN - 2
            || der[2..4] != [0x80, 0x20]
            || der[36..38] != [0x81, 0x40]
        {
            return Err(LedgerError::Decode(
                "fulfillment is not an ed25519-sha-256 fulfillment".to_string(),
            ));
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&der[4..36]);
        let public_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| LedgerError::Decode(format!("invalid public key: {}", e)))?;

        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(&der[38..102]);

        Ok(Self::new(public_key, Signature::from_bytes(&sig_bytes)))
    }

    /// Check the signature over `message`.
    pub fn validate(&self, message: &[u8]) -> bool {
        self.public_key.verify(message, &self.signature).is_ok()
    }

    /// The condition this fulfillment satisfies.
    pub fn condition_uri(&self) -> String {
        condition_uri(&self.public_key)
    }
}
