//! Locksmith membership registry.

use lockshop_types::Address;
use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::info;

/// Identities authorized to sign new-lock requests.
///
/// Seeded with a master identity at construction. Membership is extended by
/// the external admin surface; the marketplace only ever consults it.
#[derive(Debug)]
pub struct LocksmithRegistry {
    members: RwLock<HashSet<Address>>,
}

impl LocksmithRegistry {
    /// Create the registry with its master locksmith.
    pub fn new(master: &Address) -> Self {
        let mut members = HashSet::new();
        members.insert(*master);
        Self {
            members: RwLock::new(members),
        }
    }

    /// Pure membership check.
    pub fn is_locksmith(&self, who: &Address) -> bool {
        self.members.read().contains(who)
    }

    /// Admin surface: authorize another locksmith.
    pub fn add_locksmith(&self, who: &Address) {
        self.members.write().insert(*who);
        info!(target: "market", "locksmith added: {}", who);
    }
}
