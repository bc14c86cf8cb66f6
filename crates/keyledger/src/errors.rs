//! Error types for the key ledger

use lockshop_crypto::RecoverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyLedgerError {
    #[error("key not found: {key_id}")]
    KeyNotFound { key_id: u64 },

    #[error("caller is not an authorized minter")]
    NotMinter,

    #[error("transfer of key {key_id} not held by from")]
    NotOwner { key_id: u64 },

    #[error("caller is neither owner nor approved for key {key_id}")]
    NotAuthorized { key_id: u64 },

    #[error("key {key_id} is not transferable")]
    TransferDisabled { key_id: u64 },

    #[error("permit deadline expired")]
    PermitExpired,

    #[error("permit signer is not the key owner")]
    InvalidSigner,

    #[error("holder proof deadline too far from now")]
    DeadlineTooFar,

    #[error("the key was expired")]
    KeyExpired,

    #[error(transparent)]
    Signature(#[from] RecoverError),
}

pub type Result<T> = std::result::Result<T, KeyLedgerError>;
