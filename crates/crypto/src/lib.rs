//! Typed-data hashing and recoverable signatures
//!
//! Implements the authorization primitives every signed lockshop operation
//! rests on: Keccak-256, EIP-712-style domain separation and struct hashing,
//! secp256k1 signature recovery, and a wallet-side signer. Verification is
//! pure — the stateful components decide what a recovered identity is worth.

pub mod hashing;
pub mod recover;
pub mod signer;
pub mod typed_data;

pub use hashing::keccak256;
pub use recover::{address_of_key, recover_signer, EcdsaSignature, RecoverError};
pub use signer::Signer;
pub use typed_data::{signing_digest, TypedDomain, TypedMessage};
