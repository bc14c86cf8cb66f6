//! Per-(owner, key) permit nonces.

use lockshop_types::Address;
use std::collections::HashMap;

/// Monotonic counters preventing permit replay.
///
/// A permit signature covers the counter value current at signing time;
/// consuming the permit advances the counter by exactly 1, so the same
/// signature can never be accepted twice. Off-path signers read the exact
/// value to sign through [`NonceTracker::current`].
#[derive(Debug, Default)]
pub struct NonceTracker {
    counters: HashMap<(Address, u64), u64>,
}

impl NonceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value the next permit signature must cover.
    pub fn current(&self, owner: &Address, key_id: u64) -> u64 {
        self.counters.get(&(*owner, key_id)).copied().unwrap_or(0)
    }

    /// Advance the counter after a successfully verified permit.
    pub fn consume(&mut self, owner: &Address, key_id: u64) {
        *self.counters.entry((*owner, key_id)).or_insert(0) += 1;
    }
}
