//! Native coin ledger capability.

use crate::AssetError;
use disperse_types::Address;

/// The chain's base coin.
pub trait NativeAsset {
    fn balance_of(&self, account: &Address) -> u128;

    /// Move `amount` from `from` to `to`.
    ///
    /// Returns `Ok(false)` when the recipient refuses the payment.
    fn send(&mut self, from: &Address, to: &Address, amount: u128) -> Result<bool, AssetError>;
}
