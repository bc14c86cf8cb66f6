//! Wallet-side signing of typed-data digests.

use crate::recover::{address_of_key, EcdsaSignature};
use crate::typed_data::{signing_digest, TypedDomain, TypedMessage};
use anyhow::{anyhow, Result};
use k256::ecdsa::SigningKey;
use lockshop_types::Address;
use rand_core::OsRng;

/// A secp256k1 signing identity.
///
/// Produces the recoverable signatures the registry and marketplace verify.
/// Lives off the hot path: permits, holder proofs, and new-lock requests are
/// signed out of band and submitted by whoever carries them.
pub struct Signer {
    signing_key: SigningKey,
}

impl Signer {
    /// Generate a fresh random identity.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Construct from 32 raw secret bytes.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| anyhow!("secret key is out of range"))?;
        Ok(Self { signing_key })
    }

    /// The account address this signer proves.
    pub fn address(&self) -> Address {
        address_of_key(self.signing_key.verifying_key())
    }

    /// The raw secret bytes, for keyfile storage.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }

    /// Sign a prehashed 32-byte digest.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<EcdsaSignature> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| anyhow!("signing failed"))?;

        let r: [u8; 32] = signature.r().to_bytes().into();
        let s: [u8; 32] = signature.s().to_bytes().into();

        Ok(EcdsaSignature {
            r,
            s,
            v: 27 + recovery_id.to_byte(),
        })
    }

    /// Sign a structured message under a domain descriptor.
    pub fn sign_typed<M: TypedMessage>(
        &self,
        domain: &TypedDomain,
        message: &M,
    ) -> Result<EcdsaSignature> {
        self.sign_digest(&signing_digest(domain, message))
    }
}
