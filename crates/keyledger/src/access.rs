//! Minter access control.
//!
//! Who may mint is decided outside the ledger; the ledger only consults the
//! collaborator. `MinterSet` is the default set-backed implementation, with
//! a grant/revoke surface for the external admin (granting the marketplace
//! its mint rights at deployment, swapping factories, and so on).

use lockshop_types::Address;
use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::info;

/// Capability check consulted on every mint.
pub trait AccessController: Send + Sync {
    fn is_minter(&self, who: &Address) -> bool;
}

/// Set-backed minter registry.
#[derive(Debug, Default)]
pub struct MinterSet {
    minters: RwLock<HashSet<Address>>,
}

impl MinterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant mint rights to an identity.
    pub fn grant(&self, who: &Address) {
        self.minters.write().insert(*who);
        info!(target: "keyledger", "granted mint rights to {}", who);
    }

    /// Revoke mint rights from an identity.
    pub fn revoke(&self, who: &Address) {
        self.minters.write().remove(who);
        info!(target: "keyledger", "revoked mint rights from {}", who);
    }
}

impl AccessController for MinterSet {
    fn is_minter(&self, who: &Address) -> bool {
        self.minters.read().contains(who)
    }
}
