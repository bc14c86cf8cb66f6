//! Marketplace listing terms.

use crate::Address;
use serde::{Deserialize, Serialize};

/// Sale terms of a lock, keyed by content hash in the marketplace.
///
/// `owner` is the seller. The remaining fields are the mutable "ask": the
/// payment asset, the price, the validity period granted to minted keys, and
/// whether minted keys may be transferred on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ask {
    /// Seller identity. `Address::ZERO` means the owner is not yet set.
    pub owner: Address,
    /// Payment-asset identifier on the external fungible ledger.
    pub token: Address,
    /// Price in the payment asset's base units.
    pub amount: u128,
    /// Validity duration, in seconds, granted to keys minted under this ask.
    pub period: u64,
    /// Copied into minted keys as their `transferable` flag.
    pub is_transfer_allowed: bool,
}

impl Ask {
    /// Whether the listing has an established owner.
    pub fn has_owner(&self) -> bool {
        !self.owner.is_zero()
    }
}
