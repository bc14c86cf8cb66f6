//! Domain separation and struct hashing for signed messages.
//!
//! Every signed operation hashes a fixed-order field layout under a domain
//! descriptor, so a signature for one operation (or one deployment) can never
//! be replayed against another. The encoding follows the typed-data
//! convention the original wallets sign with: 32-byte words, strings hashed,
//! integers big-endian, addresses left-padded.

use crate::hashing::keccak256;
use lockshop_types::{Address, ADDRESS_BYTES};
use serde::{Deserialize, Serialize};

/// Type descriptor of the domain record itself.
pub const DOMAIN_TYPE_DESCRIPTOR: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Domain descriptor binding signatures to one protocol deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl TypedDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// The 32-byte domain separator mixed into every signing digest.
    pub fn separator(&self) -> [u8; 32] {
        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(&keccak256(DOMAIN_TYPE_DESCRIPTOR.as_bytes()));
        encoded.extend_from_slice(&encode_string(&self.name));
        encoded.extend_from_slice(&encode_string(&self.version));
        encoded.extend_from_slice(&encode_uint(u128::from(self.chain_id)));
        encoded.extend_from_slice(&encode_address(&self.verifying_contract));
        keccak256(&encoded)
    }
}

/// A structured record with a fixed type descriptor and field order.
///
/// Implementations append their fields, each as one 32-byte word, in the
/// order the descriptor declares them.
pub trait TypedMessage {
    /// Canonical type string, e.g. `Permit(address spender,...)`.
    const TYPE_DESCRIPTOR: &'static str;

    /// Append the encoded fields, in declaration order.
    fn encode_fields(&self, out: &mut Vec<u8>);

    /// Hash of the type descriptor followed by the encoded fields.
    fn struct_hash(&self) -> [u8; 32] {
        let mut encoded = Vec::with_capacity(6 * 32);
        encoded.extend_from_slice(&keccak256(Self::TYPE_DESCRIPTOR.as_bytes()));
        self.encode_fields(&mut encoded);
        keccak256(&encoded)
    }
}

/// The digest a wallet actually signs: `keccak256(0x19 ‖ 0x01 ‖ domain ‖ message)`.
pub fn signing_digest<M: TypedMessage>(domain: &TypedDomain, message: &M) -> [u8; 32] {
    let mut data = Vec::with_capacity(2 + 2 * 32);
    data.extend_from_slice(&[0x19, 0x01]);
    data.extend_from_slice(&domain.separator());
    data.extend_from_slice(&message.struct_hash());
    keccak256(&data)
}

/// Encode an unsigned integer as a 32-byte big-endian word.
pub fn encode_uint(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encode an address left-padded to a 32-byte word.
pub fn encode_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[32 - ADDRESS_BYTES..].copy_from_slice(address.as_bytes());
    word
}

/// Encode a dynamic string as the hash of its bytes.
pub fn encode_string(value: &str) -> [u8; 32] {
    keccak256(value.as_bytes())
}
