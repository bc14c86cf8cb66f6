//! Keccak-256, the hash underlying every typed-data digest.

use sha3::{Digest, Keccak256};

/// Hash arbitrary bytes with Keccak-256.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
