//! Platform fee configuration for marketplace settlement.

use crate::Address;
use serde::{Deserialize, Serialize};

/// Basis-point denominator for fee rates.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Fee terms applied to every sale: recipient and rate in basis points.
///
/// The fee is a split of the buyer's payment, never an additional charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Identity credited with the platform's share of each sale.
    pub fee_to: Address,
    /// Fee rate in basis points (250 = 2.5%).
    pub fee_bps: u16,
}

impl FeeConfig {
    /// Split a payment into `(seller_share, fee_share)`.
    ///
    /// The two shares always sum to exactly `amount`; rounding goes to the
    /// seller.
    pub fn split(&self, amount: u128) -> (u128, u128) {
        let fee = amount * u128::from(self.fee_bps) / BPS_DENOMINATOR;
        (amount - fee, fee)
    }
}
