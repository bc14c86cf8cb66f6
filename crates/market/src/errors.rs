//! Error types for the marketplace

use crate::payment::PaymentError;
use lockshop_crypto::RecoverError;
use lockshop_keyledger::KeyLedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Locksmith::verifyNewLockRequest: sig deadline expired")]
    ExpiredSignature,

    #[error("Locksmith::newLock: signer is not a locksmith")]
    NotLocksmith,

    #[error("lock already exists for content {content_hash}")]
    LockExists { content_hash: String },

    #[error("no lock for content {content_hash}")]
    LockNotFound { content_hash: String },

    #[error("SET_ASK::EITHER OWNER OR EMPTY")]
    SetAskForbidden,

    #[error("caller is not the lock owner")]
    Unauthorized,

    /// The external payment ledger rejected the debit; its reason passes
    /// through unmodified.
    #[error("{0}")]
    InsufficientPayment(#[from] PaymentError),

    #[error(transparent)]
    KeyLedger(#[from] KeyLedgerError),

    #[error(transparent)]
    Signature(#[from] RecoverError),
}

pub type Result<T> = std::result::Result<T, MarketError>;
