//! Minimal fungible-token capability.

use crate::AssetError;
use disperse_types::Address;

/// Any compliant token contract.
///
/// Mutating calls return `Ok(true)` on success. A non-compliant token may return
/// `Ok(false)` instead of failing; callers must treat that exactly like an `Err`.
pub trait FungibleAsset {
    fn balance_of(&self, account: &Address) -> u128;

    fn allowance(&self, owner: &Address, spender: &Address) -> u128;

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128)
        -> Result<bool, AssetError>;

    /// Push `amount` from `sender`'s own balance.
    fn transfer(&mut self, sender: &Address, recipient: &Address, amount: u128)
        -> Result<bool, AssetError>;

    /// Pull `amount` from `owner` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<bool, AssetError>;
}
