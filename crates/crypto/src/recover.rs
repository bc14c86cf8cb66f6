//! Signature recovery: from `(digest, r, s, v)` back to the signer identity.

use crate::hashing::keccak256;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use lockshop_types::{Address, Eip712Signature, ADDRESS_BYTES};

/// The two ECDSA scalars plus the recovery id in its Ethereum form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl From<&Eip712Signature> for EcdsaSignature {
    fn from(sig: &Eip712Signature) -> Self {
        Self {
            r: sig.r,
            s: sig.s,
            v: sig.v,
        }
    }
}

/// Ways a signature can fail to yield a signer.
///
/// Callers treat any of these as "verification failed"; whether that is a
/// hard error or a boolean `false` is decided per operation.
#[derive(Debug, thiserror::Error)]
pub enum RecoverError {
    #[error("invalid recovery id: v = {v}, expected 27 or 28")]
    InvalidRecoveryId { v: u8 },

    #[error("signature scalars are out of range")]
    MalformedScalars,

    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// Recover the signing identity from a 32-byte digest and a signature.
pub fn recover_signer(
    digest: &[u8; 32],
    signature: &EcdsaSignature,
) -> Result<Address, RecoverError> {
    let recovery_id = signature
        .v
        .checked_sub(27)
        .filter(|byte| *byte < 2)
        .and_then(RecoveryId::from_byte)
        .ok_or(RecoverError::InvalidRecoveryId { v: signature.v })?;

    let parsed = Signature::from_scalars(signature.r, signature.s)
        .map_err(|_| RecoverError::MalformedScalars)?;

    let key = VerifyingKey::recover_from_prehash(digest, &parsed, recovery_id)
        .map_err(|_| RecoverError::RecoveryFailed)?;

    Ok(address_of_key(&key))
}

/// Derive the 20-byte account address of a secp256k1 public key.
///
/// The address is the trailing 20 bytes of the Keccak-256 hash of the
/// uncompressed curve point (without its `0x04` tag byte).
pub fn address_of_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; ADDRESS_BYTES];
    bytes.copy_from_slice(&digest[32 - ADDRESS_BYTES..]);
    Address::new(bytes)
}
