//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! OS entropy
//!     → keypair.rs (mnemonic → seed → Ed25519 keypair, one per run)
//!     → transaction.rs (asset + metadata + condition, signed)
//!         ↳ condition.rs (ed25519-sha-256 condition / fulfillment encoding)
//!         ↳ canonical.rs (sorted-key JSON, SHA3-256)
//!     → client.rs (commit-mode submit, fetch by id, with timeouts)
//! ```
//!
//! # Security Constraints
//! - Keys live only in memory for the duration of a run
//! - Never log private keys
//! - All node calls have configurable timeouts
//! - No retries: every failure is surfaced to the caller

pub mod canonical;
pub mod client;
pub mod condition;
pub mod keypair;
pub mod transaction;
pub mod types;

pub use client::LedgerClient;
pub use keypair::Keypair;
pub use transaction::{build_and_sign, SignedTransaction};
pub use types::{LedgerConfig, LedgerError, LedgerResult, TransactionId, TransactionRecord};
