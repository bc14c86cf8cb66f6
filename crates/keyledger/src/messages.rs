//! Signed-message layouts verified by the ledger.

use lockshop_crypto::typed_data::{encode_address, encode_uint};
use lockshop_crypto::TypedMessage;
use lockshop_types::Address;

/// Off-path transfer approval for one key.
///
/// `nonce` must be the owner's current permit nonce for the key at signing
/// time; a stale value makes the signature unrecoverable against the owner.
#[derive(Debug, Clone)]
pub struct PermitMessage {
    pub spender: Address,
    pub token_id: u64,
    pub nonce: u64,
    pub deadline: u64,
}

impl TypedMessage for PermitMessage {
    const TYPE_DESCRIPTOR: &'static str =
        "Permit(address spender,uint256 tokenId,uint256 nonce,uint256 deadline)";

    fn encode_fields(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&encode_address(&self.spender));
        out.extend_from_slice(&encode_uint(u128::from(self.token_id)));
        out.extend_from_slice(&encode_uint(u128::from(self.nonce)));
        out.extend_from_slice(&encode_uint(u128::from(self.deadline)));
    }
}

/// Read-only proof that the current holder authorized this specific check.
#[derive(Debug, Clone)]
pub struct HolderProofMessage {
    pub token_id: u64,
    pub deadline: u64,
}

impl TypedMessage for HolderProofMessage {
    const TYPE_DESCRIPTOR: &'static str = "VerifyKeyHolder(uint256 tokenId,uint256 deadline)";

    fn encode_fields(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&encode_uint(u128::from(self.token_id)));
        out.extend_from_slice(&encode_uint(u128::from(self.deadline)));
    }
}
