//! Checked asset movements shared by the distributor and the escrow ledger.
//!
//! A token returning `false` and a token reverting are the same outcome here:
//! both become [`DisperseError::TransferFailed`] and abort the invocation.

use crate::error::DisperseError;
use disperse_asset::{AssetError, CallContext, FungibleAsset, Host};
use disperse_types::Address;
use tracing::trace;

fn settle(to: &Address, outcome: Result<bool, AssetError>) -> Result<(), DisperseError> {
    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(DisperseError::TransferFailed {
            to: *to,
            reason: "call returned false".into(),
        }),
        Err(e) => Err(DisperseError::transfer(*to, e)),
    }
}

fn token<'a, H: Host>(host: &'a H, asset: &Address) -> Result<&'a dyn FungibleAsset, DisperseError> {
    host.fungible(asset).ok_or(DisperseError::UnknownAsset(*asset))
}

fn token_mut<'a, H: Host>(
    host: &'a mut H,
    asset: &Address,
) -> Result<&'a mut dyn FungibleAsset, DisperseError> {
    host.fungible_mut(asset).ok_or(DisperseError::UnknownAsset(*asset))
}

/// Move the value attached to the call from the caller into the contract.
pub fn receive_native<H: Host>(
    host: &mut H,
    ctx: &CallContext,
    contract: &Address,
) -> Result<(), DisperseError> {
    if ctx.value == 0 {
        return Ok(());
    }
    trace!(caller = %ctx.caller, value = ctx.value, "receiving attached value");
    settle(contract, host.native_mut().send(&ctx.caller, contract, ctx.value))
}

/// Pay `amount` of native value out of the contract.
pub fn push_native<H: Host>(
    host: &mut H,
    contract: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), DisperseError> {
    settle(to, host.native_mut().send(contract, to, amount))
}

/// How much `owner` has authorized the contract to pull.
pub fn allowance<H: Host>(
    host: &H,
    asset: &Address,
    owner: &Address,
    contract: &Address,
) -> Result<u128, DisperseError> {
    Ok(token(host, asset)?.allowance(owner, contract))
}

/// Pull `amount` of `asset` from `owner` into the contract.
pub fn pull_fungible<H: Host>(
    host: &mut H,
    asset: &Address,
    owner: &Address,
    contract: &Address,
    amount: u128,
) -> Result<(), DisperseError> {
    let outcome = token_mut(host, asset)?.transfer_from(contract, owner, contract, amount);
    settle(contract, outcome)
}

/// Push `amount` of `asset` from the contract to `to`.
pub fn push_fungible<H: Host>(
    host: &mut H,
    asset: &Address,
    contract: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), DisperseError> {
    let outcome = token_mut(host, asset)?.transfer(contract, to, amount);
    settle(to, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use disperse_asset::{MemoryHost, MemoryToken, TokenFault};

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn false_return_is_a_failure() {
        let mut host = MemoryHost::new();
        let mut token = MemoryToken::new("BAD").with_fault(TokenFault::PushReturnsFalse);
        token.mint(&addr(9), 10).unwrap();
        host.deploy_token(addr(7), token);

        let err = push_fungible(&mut host, &addr(7), &addr(9), &addr(1), 5).unwrap_err();
        assert!(matches!(err, DisperseError::TransferFailed { .. }));
    }

    #[test]
    fn unknown_asset_is_reported() {
        let mut host = MemoryHost::new();
        let err = pull_fungible(&mut host, &addr(7), &addr(1), &addr(9), 5).unwrap_err();
        assert!(matches!(err, DisperseError::UnknownAsset(a) if a == addr(7)));
        assert!(allowance(&host, &addr(7), &addr(1), &addr(9)).is_err());
    }

    #[test]
    fn pull_without_allowance_is_allowance_failure() {
        let mut host = MemoryHost::new();
        let mut token = MemoryToken::new("MOCK");
        token.mint(&addr(1), 10).unwrap();
        host.deploy_token(addr(7), token);

        let err = pull_fungible(&mut host, &addr(7), &addr(1), &addr(9), 5).unwrap_err();
        assert!(matches!(err, DisperseError::InsufficientAllowance { required: 5, available: 0 }));
    }

    #[test]
    fn receive_native_ignores_zero_value() {
        let mut host = MemoryHost::new();
        let ctx = CallContext::new(addr(1));
        assert!(receive_native(&mut host, &ctx, &addr(9)).is_ok());
    }
}
