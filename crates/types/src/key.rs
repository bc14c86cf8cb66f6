//! Key records held by the ledger.

use serde::{Deserialize, Serialize};

/// Metadata attached to a key at mint time.
///
/// All three fields are immutable once the key exists. `expire_at` bounds
/// holder proofs only: an expired key remains a valid, ownable, transferable
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    /// Absolute Unix timestamp after which holder proofs are void.
    pub expire_at: u64,
    /// Whether the key may change hands after the mint-time assignment.
    pub transferable: bool,
    /// Opaque identifier of the protected content. Many keys may share one.
    pub content_hash: String,
}

/// A key as stored in the ledger: current holder plus mint-time metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRecord {
    pub owner: crate::Address,
    pub data: KeyData,
}
