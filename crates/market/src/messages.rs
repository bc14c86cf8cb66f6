//! Signed-message layout for locksmith-delegated listings.

use lockshop_crypto::typed_data::{encode_address, encode_string, encode_uint};
use lockshop_crypto::TypedMessage;
use lockshop_types::Address;

/// A locksmith's authorization for one new listing.
///
/// The locksmith binds price, payment token, validity period, and content
/// hash. The listing owner and the transferability flag are deliberately
/// outside the signed payload: they are taken from the submitted terms.
#[derive(Debug, Clone)]
pub struct NewLockRequestMessage {
    pub content_hash: String,
    pub token: Address,
    pub amount: u128,
    pub period: u64,
    pub deadline: u64,
}

impl TypedMessage for NewLockRequestMessage {
    const TYPE_DESCRIPTOR: &'static str =
        "NewLockRequest(string contentHash,address token,uint256 amount,uint256 period,uint256 deadline)";

    fn encode_fields(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&encode_string(&self.content_hash));
        out.extend_from_slice(&encode_address(&self.token));
        out.extend_from_slice(&encode_uint(self.amount));
        out.extend_from_slice(&encode_uint(u128::from(self.period)));
        out.extend_from_slice(&encode_uint(u128::from(self.deadline)));
    }
}
