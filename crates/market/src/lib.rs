//! Key marketplace
//!
//! Sells content access keys. A locksmith signs a new-lock request off the
//! hot path; whoever carries the signature submits it to register the
//! listing. The listing owner keeps its ask current, and buyers settle
//! atomically: pay the owner, split the platform fee, mint the key.

pub mod errors;
pub mod locksmiths;
pub mod messages;
pub mod payment;
pub mod shop;

pub use errors::{MarketError, Result};
pub use locksmiths::LocksmithRegistry;
pub use messages::NewLockRequestMessage;
pub use payment::{FungibleLedger, PaymentError, TokenLedger};
pub use shop::Marketplace;
