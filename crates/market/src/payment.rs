//! Fungible payment-ledger collaborator.
//!
//! Settlement only needs `transfer`, `transfer_from`, and `balance_of`; the
//! asset itself lives outside this core. `TokenLedger` is the in-memory
//! implementation used by tests and local deployments.

use lockshop_types::Address;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

/// A rejection from the payment ledger. The reason string is the ledger's
/// own and is surfaced to callers unmodified.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct PaymentError {
    pub reason: String,
}

impl PaymentError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The external fungible-asset ledger the marketplace settles against.
pub trait FungibleLedger: Send + Sync {
    /// Move `amount` from the caller's own account.
    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), PaymentError>;

    /// Move `amount` out of `from` on behalf of `spender`, consuming
    /// allowance.
    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), PaymentError>;

    fn balance_of(&self, who: &Address) -> u128;
}

#[derive(Debug, Default)]
struct TokenState {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
}

/// In-memory mintable token ledger with balances and allowances.
#[derive(Debug, Default)]
pub struct TokenLedger {
    state: RwLock<TokenState>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit freshly minted units to `to`.
    pub fn mint(&self, to: &Address, amount: u128) {
        let mut state = self.state.write();
        *state.balances.entry(*to).or_insert(0) += amount;
    }

    /// Let `spender` move up to `amount` out of `owner`'s account.
    pub fn approve(&self, owner: &Address, spender: &Address, amount: u128) {
        let mut state = self.state.write();
        state.allowances.insert((*owner, *spender), amount);
    }

    /// Remaining allowance of `spender` over `owner`'s account.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.state
            .read()
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }
}

impl FungibleLedger for TokenLedger {
    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), PaymentError> {
        let mut state = self.state.write();

        let balance = state.balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(PaymentError::new("transfer amount exceeds balance"));
        }

        state.balances.insert(*from, balance - amount);
        *state.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), PaymentError> {
        let mut state = self.state.write();

        let balance = state.balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(PaymentError::new("transfer amount exceeds balance"));
        }
        let allowance = state.allowances.get(&(*from, *spender)).copied().unwrap_or(0);
        if allowance < amount {
            return Err(PaymentError::new("transfer amount exceeds allowance"));
        }

        state.balances.insert(*from, balance - amount);
        *state.balances.entry(*to).or_insert(0) += amount;
        state.allowances.insert((*from, *spender), allowance - amount);
        Ok(())
    }

    fn balance_of(&self, who: &Address) -> u128 {
        self.state.read().balances.get(who).copied().unwrap_or(0)
    }
}
