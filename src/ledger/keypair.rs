//! Signing identity for a single run.
//!
//! # Security
//! - Keys are generated fresh from OS entropy for every run
//! - Keys are never logged, serialized or written to disk
//! - The secret half is redacted from `Debug` output

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::ledger::types::{LedgerError, LedgerResult};

/// Entropy behind the generated mnemonic (128 bits, 12 words).
const MNEMONIC_ENTROPY_BYTES: usize = 16;

/// Ed25519 keypair that owns and signs the run's transaction.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a keypair from a freshly generated BIP-39 mnemonic.
    ///
    /// The mnemonic is expanded to its 64-byte seed (empty passphrase) and
    /// the first 32 bytes become the Ed25519 secret.
    pub fn generate() -> LedgerResult<Self> {
        let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|e| LedgerError::KeyGeneration(format!("entropy source failed: {}", e)))?;

        let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
            .map_err(|e| LedgerError::KeyGeneration(format!("invalid mnemonic entropy: {}", e)))?;
        let seed = mnemonic.to_seed("");

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed[..32]);

        let keypair = Self::from_seed(&secret);
        tracing::debug!(public_key = %keypair.public_key_base58(), "Signing keypair generated");
        Ok(keypair)
    }

    /// Build a keypair from a raw 32-byte secret.
    pub fn from_seed(secret: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Public key as the ledger renders it (base58).
    pub fn public_key_base58(&self) -> String {
        bs58::encode(self.public_key().as_bytes()).into_string()
    }

    /// Sign arbitrary bytes.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature).is_ok()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key_base58())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keypairs_are_distinct() {
        let a = Keypair::generate().unwrap();
        let b = Keypair::generate().unwrap();
        assert_ne!(a.public_key_base58(), b.public_key_base58());
    }

    #[test]
    fn test_from_seed_is_deterministic() {
        let a = Keypair::from_seed(&[7u8; 32]);
        let b = Keypair::from_seed(&[7u8; 32]);
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_public_key_base58_round_trips() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let decoded = bs58::decode(keypair.public_key_base58()).into_vec().unwrap();
        assert_eq!(decoded, keypair.public_key().as_bytes().to_vec());
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::generate().unwrap();
        let signature = keypair.sign(b"financial_data");
        assert!(keypair.verify(b"financial_data", &signature));
        assert!(!keypair.verify(b"tampered", &signature));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let keypair = Keypair::from_seed(&[9u8; 32]);
        let rendered = format!("{:?}", keypair);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&hex::encode([9u8; 32])));
    }
}
