//! Content access-key ledger
//!
//! Owns the set of issued keys, the per-owner and per-content indices, and
//! the permit nonces that make transfer approvals replay-proof. Minting is
//! gated by an external access-control collaborator; transfer rights can be
//! delegated off the hot path through signed permits, and current holdership
//! can be proven read-only through signed, time-bounded holder proofs.

pub mod access;
pub mod errors;
pub mod ledger;
pub mod messages;
pub mod nonce;

pub use access::{AccessController, MinterSet};
pub use errors::{KeyLedgerError, Result};
pub use ledger::{KeyLedger, MAX_HOLDER_PROOF_WINDOW};
pub use messages::{HolderProofMessage, PermitMessage};
pub use nonce::NonceTracker;
