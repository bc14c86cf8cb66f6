//! Key ledger implementation.
//!
//! All state lives behind a single lock so every public operation is one
//! atomic transition: the key table, both indices, approvals, and nonces can
//! never be observed half-updated.

use crate::access::AccessController;
use crate::errors::*;
use crate::messages::{HolderProofMessage, PermitMessage};
use crate::nonce::NonceTracker;
use lockshop_crypto::{recover_signer, signing_digest, EcdsaSignature, TypedDomain};
use lockshop_types::{unix_now, Address, Eip712Signature, KeyData, KeyRecord, SECONDS_PER_DAY};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Maximum distance a holder-proof deadline may sit in the future.
pub const MAX_HOLDER_PROOF_WINDOW: u64 = SECONDS_PER_DAY;

#[derive(Debug, Default)]
struct LedgerState {
    /// Key id → record. Ids are sequential and never reused.
    keys: HashMap<u64, KeyRecord>,
    next_key_id: u64,
    /// Owner → ordered list of held key ids.
    keys_by_owner: HashMap<Address, Vec<u64>>,
    /// Content hash → every key ever minted for it.
    keys_by_content: HashMap<String, Vec<u64>>,
    /// Permit nonces, (owner, key id) → counter.
    nonces: NonceTracker,
    /// One-shot per-key approvals, cleared on transfer.
    key_approvals: HashMap<u64, Address>,
    /// (owner, operator) blanket approvals.
    operators: HashSet<(Address, Address)>,
}

/// The issued-key registry.
///
/// Minting is gated by the access-control collaborator; everything signed
/// is verified under the ledger's own typed-data domain.
pub struct KeyLedger {
    state: RwLock<LedgerState>,
    access: Arc<dyn AccessController>,
    domain: TypedDomain,
}

impl KeyLedger {
    /// Create a ledger consulting the given minter authority, verifying
    /// signatures under the given domain.
    pub fn new(access: Arc<dyn AccessController>, domain: TypedDomain) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            access,
            domain,
        }
    }

    /// The domain descriptor permit and holder-proof signatures must target.
    pub fn domain(&self) -> &TypedDomain {
        &self.domain
    }

    /// Mint a new key to `to` with the given metadata, copied verbatim.
    ///
    /// The mint-time assignment is not a transfer: it succeeds regardless of
    /// the `transferable` flag.
    pub fn mint(&self, caller: &Address, to: &Address, data: KeyData) -> Result<u64> {
        if !self.access.is_minter(caller) {
            return Err(KeyLedgerError::NotMinter);
        }

        let mut state = self.state.write();
        let key_id = state.next_key_id;
        state.next_key_id += 1;

        state
            .keys_by_owner
            .entry(*to)
            .or_default()
            .push(key_id);
        state
            .keys_by_content
            .entry(data.content_hash.clone())
            .or_default()
            .push(key_id);
        state.keys.insert(key_id, KeyRecord { owner: *to, data });

        debug!(target: "keyledger", "minted key {} to {}", key_id, to);
        Ok(key_id)
    }

    /// Move `key_id` from `from` to `to`.
    ///
    /// The caller must be `from`, the key's approved spender, or one of the
    /// owner's operators. The per-key approval is consumed by the transfer.
    pub fn transfer_from(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        key_id: u64,
    ) -> Result<()> {
        let mut state = self.state.write();

        {
            let record = state
                .keys
                .get(&key_id)
                .ok_or(KeyLedgerError::KeyNotFound { key_id })?;
            if record.owner != *from {
                return Err(KeyLedgerError::NotOwner { key_id });
            }

            let approved = state.key_approvals.get(&key_id) == Some(caller);
            let operator = state.operators.contains(&(*from, *caller));
            if caller != from && !approved && !operator {
                return Err(KeyLedgerError::NotAuthorized { key_id });
            }

            if !record.data.transferable {
                return Err(KeyLedgerError::TransferDisabled { key_id });
            }
        }

        if let Some(record) = state.keys.get_mut(&key_id) {
            record.owner = *to;
        }
        if let Some(held) = state.keys_by_owner.get_mut(from) {
            held.retain(|id| *id != key_id);
        }
        state.keys_by_owner.entry(*to).or_default().push(key_id);
        state.key_approvals.remove(&key_id);

        debug!(target: "keyledger", "transferred key {} from {} to {}", key_id, from, to);
        Ok(())
    }

    /// Approve `spender` for one transfer of `key_id`.
    pub fn approve(&self, caller: &Address, spender: &Address, key_id: u64) -> Result<()> {
        let mut state = self.state.write();

        let owner = state
            .keys
            .get(&key_id)
            .ok_or(KeyLedgerError::KeyNotFound { key_id })?
            .owner;
        if *caller != owner && !state.operators.contains(&(owner, *caller)) {
            return Err(KeyLedgerError::NotAuthorized { key_id });
        }

        state.key_approvals.insert(key_id, *spender);
        Ok(())
    }

    /// Grant or withdraw blanket operator rights over the caller's keys.
    pub fn set_approval_for_all(&self, caller: &Address, operator: &Address, approved: bool) {
        let mut state = self.state.write();
        if approved {
            state.operators.insert((*caller, *operator));
        } else {
            state.operators.remove(&(*caller, *operator));
        }
        debug!(target: "keyledger", "operator {} for {} set to {}", operator, caller, approved);
    }

    /// Consume a signed permit, approving `spender` for `key_id`.
    ///
    /// The signature must cover the owner's current permit nonce and an
    /// unexpired deadline, and recover to the key's current owner. Success
    /// advances the nonce by exactly 1, so a replay of the same signature
    /// fails as `InvalidSigner`.
    pub fn permit(
        &self,
        spender: &Address,
        key_id: u64,
        signature: &Eip712Signature,
    ) -> Result<()> {
        if unix_now() > signature.deadline {
            return Err(KeyLedgerError::PermitExpired);
        }

        let mut state = self.state.write();
        let owner = state
            .keys
            .get(&key_id)
            .ok_or(KeyLedgerError::KeyNotFound { key_id })?
            .owner;

        let message = PermitMessage {
            spender: *spender,
            token_id: key_id,
            nonce: state.nonces.current(&owner, key_id),
            deadline: signature.deadline,
        };
        let digest = signing_digest(&self.domain, &message);
        let recovered = recover_signer(&digest, &EcdsaSignature::from(signature))?;
        if recovered != owner {
            return Err(KeyLedgerError::InvalidSigner);
        }

        state.nonces.consume(&owner, key_id);
        state.key_approvals.insert(key_id, *spender);

        debug!(target: "keyledger", "permit consumed for key {}, spender {}", key_id, spender);
        Ok(())
    }

    /// Check a signed, time-bounded proof of current holdership.
    ///
    /// Returns `Ok(false)` when the recovered signer is not the holder —
    /// the one retryable outcome. A deadline outside the accepted window or
    /// an expired key is a hard failure instead, so callers can tell a
    /// malformed or dead proof request from a plain authorization miss.
    pub fn verify_key_holder(&self, key_id: u64, signature: &Eip712Signature) -> Result<bool> {
        let now = unix_now();
        match signature.deadline.checked_sub(now) {
            Some(window) if window <= MAX_HOLDER_PROOF_WINDOW => {}
            _ => return Err(KeyLedgerError::DeadlineTooFar),
        }

        let state = self.state.read();
        let record = state
            .keys
            .get(&key_id)
            .ok_or(KeyLedgerError::KeyNotFound { key_id })?;
        if record.data.expire_at < now {
            return Err(KeyLedgerError::KeyExpired);
        }

        let message = HolderProofMessage {
            token_id: key_id,
            deadline: signature.deadline,
        };
        let digest = signing_digest(&self.domain, &message);
        match recover_signer(&digest, &EcdsaSignature::from(signature)) {
            Ok(signer) => Ok(signer == record.owner),
            Err(_) => Ok(false),
        }
    }

    /// Number of keys currently held by `owner`.
    pub fn balance_of(&self, owner: &Address) -> u64 {
        let state = self.state.read();
        state
            .keys_by_owner
            .get(owner)
            .map(|held| held.len() as u64)
            .unwrap_or(0)
    }

    /// Every key held by `owner`, with its metadata, in acquisition order.
    pub fn list_keys(&self, owner: &Address) -> Vec<(u64, KeyData)> {
        let state = self.state.read();
        state
            .keys_by_owner
            .get(owner)
            .into_iter()
            .flatten()
            .filter_map(|id| state.keys.get(id).map(|record| (*id, record.data.clone())))
            .collect()
    }

    /// Current holder of `key_id`.
    pub fn owner_of(&self, key_id: u64) -> Result<Address> {
        let state = self.state.read();
        state
            .keys
            .get(&key_id)
            .map(|record| record.owner)
            .ok_or(KeyLedgerError::KeyNotFound { key_id })
    }

    /// Every key ever minted for `content_hash`.
    pub fn content_to_token_ids(&self, content_hash: &str) -> Vec<u64> {
        let state = self.state.read();
        state
            .keys_by_content
            .get(content_hash)
            .cloned()
            .unwrap_or_default()
    }

    /// The nonce the next permit signature for `(owner, key_id)` must cover.
    pub fn permit_nonce(&self, owner: &Address, key_id: u64) -> u64 {
        self.state.read().nonces.current(owner, key_id)
    }

    /// The spender currently approved for `key_id`, if any.
    pub fn approved_for(&self, key_id: u64) -> Option<Address> {
        self.state.read().key_approvals.get(&key_id).copied()
    }

    /// Whether `operator` holds blanket rights over `owner`'s keys.
    pub fn is_operator(&self, owner: &Address, operator: &Address) -> bool {
        self.state.read().operators.contains(&(*owner, *operator))
    }
}
