//! Marketplace implementation: lock lifecycle and settlement.

use crate::errors::*;
use crate::locksmiths::LocksmithRegistry;
use crate::messages::NewLockRequestMessage;
use crate::payment::FungibleLedger;
use lockshop_crypto::{recover_signer, signing_digest, EcdsaSignature, TypedDomain};
use lockshop_keyledger::KeyLedger;
use lockshop_types::{unix_now, Address, Ask, Eip712Signature, FeeConfig, KeyData};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// The lock-and-ask marketplace.
///
/// Owns listing state only; key state stays with the [`KeyLedger`], and
/// payments move on the external fungible ledger. The marketplace has its
/// own account identity, which doubles as the verifying contract of its
/// signature domain and must hold mint rights on the key ledger.
pub struct Marketplace {
    address: Address,
    domain: TypedDomain,
    asks: RwLock<HashMap<String, Ask>>,
    keys: Arc<KeyLedger>,
    locksmiths: Arc<LocksmithRegistry>,
    payment: Arc<dyn FungibleLedger>,
    fees: FeeConfig,
}

impl Marketplace {
    pub fn new(
        address: Address,
        chain_id: u64,
        keys: Arc<KeyLedger>,
        locksmiths: Arc<LocksmithRegistry>,
        payment: Arc<dyn FungibleLedger>,
        fees: FeeConfig,
    ) -> Self {
        Self {
            domain: TypedDomain::new("LocksmithShop", "1", chain_id, address),
            address,
            asks: RwLock::new(HashMap::new()),
            keys,
            locksmiths,
            payment,
            fees,
        }
    }

    /// The marketplace's own account identity.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The domain descriptor new-lock requests must be signed under.
    pub fn domain(&self) -> &TypedDomain {
        &self.domain
    }

    /// Identity credited with the platform's share of each sale.
    pub fn fee_to(&self) -> Address {
        self.fees.fee_to
    }

    /// Current terms listed for `content_hash`, if any.
    pub fn asks(&self, content_hash: &str) -> Option<Ask> {
        self.asks.read().get(content_hash).cloned()
    }

    /// Recover the signer of a new-lock request — the diagnostic variant.
    ///
    /// Only the price/token/period/content binding is signed; the owner and
    /// transferability flag come from the submitted terms as-is.
    pub fn recover_new_lock_request(
        &self,
        content_hash: &str,
        terms: &Ask,
        signature: &Eip712Signature,
    ) -> Result<Address> {
        if unix_now() > signature.deadline {
            return Err(MarketError::ExpiredSignature);
        }

        let message = NewLockRequestMessage {
            content_hash: content_hash.to_string(),
            token: terms.token,
            amount: terms.amount,
            period: terms.period,
            deadline: signature.deadline,
        };
        let digest = signing_digest(&self.domain, &message);
        Ok(recover_signer(&digest, &EcdsaSignature::from(signature))?)
    }

    /// Whether a new-lock request carries a registered locksmith's approval.
    pub fn verify_new_lock_request(
        &self,
        content_hash: &str,
        terms: &Ask,
        signature: &Eip712Signature,
    ) -> Result<bool> {
        let signer = self.recover_new_lock_request(content_hash, terms, signature)?;
        Ok(self.locksmiths.is_locksmith(&signer))
    }

    /// Register a listing under a locksmith's signed approval.
    ///
    /// Authorizes the listing to exist — no payment moves and no key is
    /// minted here.
    pub fn new_lock(
        &self,
        content_hash: &str,
        terms: Ask,
        signature: &Eip712Signature,
    ) -> Result<()> {
        let signer = self.recover_new_lock_request(content_hash, &terms, signature)?;
        if !self.locksmiths.is_locksmith(&signer) {
            return Err(MarketError::NotLocksmith);
        }

        let mut asks = self.asks.write();
        if asks.contains_key(content_hash) {
            return Err(MarketError::LockExists {
                content_hash: content_hash.to_string(),
            });
        }
        asks.insert(content_hash.to_string(), terms);

        info!(target: "market", "new lock registered for {}", content_hash);
        Ok(())
    }

    /// Update a lock's sale terms.
    ///
    /// Only the lock's owner may update it. A lock without an established
    /// owner (or no lock at all) accepts the submitted terms wholesale —
    /// the bootstrap path that first establishes ownership. The owner field
    /// is never reassigned past that point.
    pub fn set_ask(&self, caller: &Address, content_hash: &str, terms: Ask) -> Result<()> {
        let mut asks = self.asks.write();
        match asks.get_mut(content_hash) {
            Some(existing) if existing.has_owner() => {
                if existing.owner != *caller {
                    return Err(MarketError::SetAskForbidden);
                }
                existing.token = terms.token;
                existing.amount = terms.amount;
                existing.period = terms.period;
                existing.is_transfer_allowed = terms.is_transfer_allowed;
            }
            Some(existing) => {
                *existing = terms;
            }
            None => {
                asks.insert(content_hash.to_string(), terms);
            }
        }

        debug!(target: "market", "ask updated for {}", content_hash);
        Ok(())
    }

    /// Mint a key under a lock's current terms — the owner's direct path.
    pub fn mint_key(&self, caller: &Address, to: &Address, content_hash: &str) -> Result<u64> {
        let terms = self
            .asks
            .read()
            .get(content_hash)
            .cloned()
            .ok_or_else(|| MarketError::LockNotFound {
                content_hash: content_hash.to_string(),
            })?;
        if terms.owner != *caller {
            return Err(MarketError::Unauthorized);
        }

        self.mint_under_terms(to, content_hash, &terms)
    }

    /// Buy one key under a lock's current terms.
    ///
    /// Settlement terms are snapshotted and the fee split fixed before any
    /// external call. The buyer is debited once for the full amount into the
    /// marketplace account — the single fallible external step — and the
    /// owner and fee recipient are then paid from funds already held, so a
    /// failed payment never produces a key and a produced key is always
    /// fully paid for.
    pub fn buy_key(&self, caller: &Address, content_hash: &str) -> Result<u64> {
        let terms = self
            .asks
            .read()
            .get(content_hash)
            .cloned()
            .ok_or_else(|| MarketError::LockNotFound {
                content_hash: content_hash.to_string(),
            })?;
        let (seller_share, fee_share) = self.fees.split(terms.amount);

        self.payment
            .transfer_from(&self.address, caller, &self.address, terms.amount)?;
        self.payment
            .transfer(&self.address, &terms.owner, seller_share)?;
        self.payment
            .transfer(&self.address, &self.fees.fee_to, fee_share)?;

        let key_id = self.mint_under_terms(caller, content_hash, &terms)?;
        info!(
            target: "market",
            "key {} sold to {} for {} ({} fee)",
            key_id,
            caller,
            terms.amount,
            fee_share
        );
        Ok(key_id)
    }

    fn mint_under_terms(&self, to: &Address, content_hash: &str, terms: &Ask) -> Result<u64> {
        let data = KeyData {
            expire_at: unix_now() + terms.period,
            transferable: terms.is_transfer_allowed,
            content_hash: content_hash.to_string(),
        };
        Ok(self.keys.mint(&self.address, to, data)?)
    }
}
