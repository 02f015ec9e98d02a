//! Batch distributor: splits one authorized total across many recipients.

use crate::allocation::{allocate, Allocation};
use crate::batch::{AllocationMode, BatchRequest};
use crate::config::EngineConfig;
use crate::error::DisperseError;
use crate::transfer;
use disperse_asset::{CallContext, Host};
use disperse_types::{Address, AssetKind};
use serde::Serialize;
use tracing::{debug, info};

/// One recipient's share of a dispersal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub recipient: Address,
    pub amount: u128,
}

/// What a completed dispersal did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisperseReceipt {
    pub kind: AssetKind,
    /// Token contract, `None` for native dispersals.
    pub asset: Option<Address>,
    pub mode: AllocationMode,
    /// Attached value or pulled allowance.
    pub total: u128,
    pub distributed: u128,
    /// Rounding remainder kept by the contract.
    pub dust: u128,
    pub payouts: Vec<Payout>,
}

impl DisperseReceipt {
    fn new(kind: AssetKind, asset: Option<Address>, batch: &BatchRequest, alloc: Allocation) -> Self {
        let payouts = batch
            .recipients
            .iter()
            .zip(alloc.payouts)
            .map(|(recipient, amount)| Payout {
                recipient: *recipient,
                amount,
            })
            .collect();
        Self {
            kind,
            asset,
            mode: batch.mode,
            total: alloc.total,
            distributed: alloc.distributed,
            dust: alloc.dust,
            payouts,
        }
    }
}

/// Stateless batch transfer engine.
///
/// Every check that can reject a batch runs before the first asset movement.
/// Funds are never parked: whatever is received is paid out in the same call,
/// except the percentage-mode dust.
#[derive(Clone, Debug, Default)]
pub struct Distributor {
    config: EngineConfig,
}

impl Distributor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Split the native value attached to the call.
    pub fn disperse_native<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        contract: &Address,
        batch: &BatchRequest,
    ) -> Result<DisperseReceipt, DisperseError> {
        batch.validate(&self.config)?;
        if ctx.value == 0 {
            return Err(DisperseError::ZeroAmount);
        }
        let alloc = allocate(batch, ctx.value)?;

        transfer::receive_native(host, ctx, contract)?;
        for (recipient, amount) in batch.recipients.iter().zip(&alloc.payouts) {
            if *amount == 0 {
                continue;
            }
            transfer::push_native(host, contract, recipient, *amount)?;
            debug!(%recipient, amount, "native payout");
        }

        let receipt = DisperseReceipt::new(AssetKind::Native, None, batch, alloc);
        info!(
            caller = %ctx.caller,
            mode = ?receipt.mode,
            recipients = receipt.payouts.len(),
            total = receipt.total,
            dust = receipt.dust,
            "native dispersal complete"
        );
        Ok(receipt)
    }

    /// Split the allowance the caller granted the contract on `asset`.
    ///
    /// The full authorized total is pulled once, before any push.
    pub fn disperse_fungible<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        contract: &Address,
        asset: &Address,
        batch: &BatchRequest,
    ) -> Result<DisperseReceipt, DisperseError> {
        if ctx.value != 0 {
            return Err(DisperseError::UnexpectedValue(ctx.value));
        }
        if asset.is_zero() {
            return Err(DisperseError::ZeroAddressAsset);
        }
        batch.validate(&self.config)?;

        let authorized = transfer::allowance(host, asset, &ctx.caller, contract)?;
        // Percentage mode needs at least one authorized unit.
        let required = match batch.mode {
            AllocationMode::Fixed => match batch.amounts_sum() {
                Some(sum) => sum.max(1),
                None => {
                    return Err(DisperseError::ValueMismatch {
                        expected: authorized,
                        actual: u128::MAX,
                    })
                }
            },
            AllocationMode::Percentage => 1,
        };
        if authorized < required {
            return Err(DisperseError::InsufficientAllowance {
                required,
                available: authorized,
            });
        }
        let alloc = allocate(batch, authorized)?;

        transfer::pull_fungible(host, asset, &ctx.caller, contract, alloc.total)?;
        for (recipient, amount) in batch.recipients.iter().zip(&alloc.payouts) {
            if *amount == 0 {
                continue;
            }
            transfer::push_fungible(host, asset, contract, recipient, *amount)?;
            debug!(%asset, %recipient, amount, "token payout");
        }

        let receipt = DisperseReceipt::new(AssetKind::Fungible, Some(*asset), batch, alloc);
        info!(
            caller = %ctx.caller,
            %asset,
            mode = ?receipt.mode,
            recipients = receipt.payouts.len(),
            total = receipt.total,
            dust = receipt.dust,
            "token dispersal complete"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disperse_asset::{atomically, FungibleAsset, MemoryHost, MemoryToken, NativeAsset};
    use crate::error::ErrorKind;
    use disperse_types::UNIT;

    const CONTRACT: Address = Address::new([0xcc; 20]);
    const TOKEN: Address = Address::new([0x70; 20]);

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn host_with_token(owner: Address, minted: u128) -> MemoryHost {
        let mut host = MemoryHost::new();
        let mut token = MemoryToken::new("MOCK");
        token.mint(&owner, minted).unwrap();
        host.deploy_token(TOKEN, token);
        host
    }

    #[test]
    fn native_fixed_pays_each_recipient() {
        let mut host = MemoryHost::new();
        host.native_ledger().mint(&addr(1), 10 * UNIT).unwrap();
        let batch = BatchRequest::fixed([(addr(2), UNIT), (addr(3), 2 * UNIT)]);

        let receipt = Distributor::default()
            .disperse_native(&mut host, &CallContext::with_value(addr(1), 3 * UNIT), &CONTRACT, &batch)
            .unwrap();

        assert_eq!(receipt.distributed, 3 * UNIT);
        assert_eq!(host.native().balance_of(&addr(1)), 7 * UNIT);
        assert_eq!(host.native().balance_of(&addr(2)), UNIT);
        assert_eq!(host.native().balance_of(&addr(3)), 2 * UNIT);
        assert_eq!(host.native().balance_of(&CONTRACT), 0);
    }

    #[test]
    fn native_percentage_leaves_dust_with_contract() {
        let mut host = MemoryHost::new();
        host.native_ledger().mint(&addr(1), 100).unwrap();
        let batch = BatchRequest::percentage([(addr(2), 500_000), (addr(3), 500_000)]);

        let receipt = Distributor::default()
            .disperse_native(&mut host, &CallContext::with_value(addr(1), 7), &CONTRACT, &batch)
            .unwrap();

        assert_eq!(receipt.dust, 1);
        assert_eq!(host.native().balance_of(&addr(2)), 3);
        assert_eq!(host.native().balance_of(&addr(3)), 3);
        assert_eq!(host.native().balance_of(&CONTRACT), 1);
    }

    #[test]
    fn native_requires_attached_value() {
        let mut host = MemoryHost::new();
        let batch = BatchRequest::fixed([(addr(2), 0)]);
        let err = Distributor::default()
            .disperse_native(&mut host, &CallContext::new(addr(1)), &CONTRACT, &batch)
            .unwrap_err();
        assert!(matches!(err, DisperseError::ZeroAmount));
    }

    #[test]
    fn native_rejected_payout_fails_and_reverts_under_atomically() {
        let mut host = MemoryHost::new();
        host.native_ledger().mint(&addr(1), 10).unwrap();
        host.native_ledger().reject_payments(addr(3));
        let batch = BatchRequest::fixed([(addr(2), 4), (addr(3), 6)]);
        let distributor = Distributor::default();

        let result = atomically(&mut host, |h| {
            distributor.disperse_native(h, &CallContext::with_value(addr(1), 10), &CONTRACT, &batch)
        });

        assert!(matches!(result, Err(DisperseError::TransferFailed { to, .. }) if to == addr(3)));
        assert_eq!(host.native().balance_of(&addr(1)), 10);
        assert_eq!(host.native().balance_of(&addr(2)), 0);
    }

    #[test]
    fn fungible_percentage_splits_whole_allowance() {
        let mut host = host_with_token(addr(1), 100 * UNIT);
        host.fungible_mut(&TOKEN).unwrap().approve(&addr(1), &CONTRACT, 100 * UNIT).unwrap();
        let batch =
            BatchRequest::percentage([(addr(2), 500_000), (addr(3), 250_000), (addr(4), 250_000)]);

        let receipt = Distributor::default()
            .disperse_fungible(&mut host, &CallContext::new(addr(1)), &CONTRACT, &TOKEN, &batch)
            .unwrap();

        let token = host.fungible(&TOKEN).unwrap();
        assert_eq!(receipt.total, 100 * UNIT);
        assert_eq!(token.balance_of(&addr(2)), 50 * UNIT);
        assert_eq!(token.balance_of(&addr(3)), 25 * UNIT);
        assert_eq!(token.balance_of(&addr(4)), 25 * UNIT);
        assert_eq!(token.allowance(&addr(1), &CONTRACT), 0);
    }

    #[test]
    fn fungible_fixed_allowance_too_small() {
        let mut host = host_with_token(addr(1), 200);
        host.fungible_mut(&TOKEN).unwrap().approve(&addr(1), &CONTRACT, 150).unwrap();
        let batch = BatchRequest::fixed([(addr(2), 100), (addr(3), 100)]);

        let err = Distributor::default()
            .disperse_fungible(&mut host, &CallContext::new(addr(1)), &CONTRACT, &TOKEN, &batch)
            .unwrap_err();
        assert!(matches!(err, DisperseError::InsufficientAllowance { required: 200, available: 150 }));
        assert_eq!(host.fungible(&TOKEN).unwrap().balance_of(&addr(1)), 200);
    }

    #[test]
    fn fungible_fixed_allowance_too_large() {
        let mut host = host_with_token(addr(1), 300);
        host.fungible_mut(&TOKEN).unwrap().approve(&addr(1), &CONTRACT, 250).unwrap();
        let batch = BatchRequest::fixed([(addr(2), 100), (addr(3), 100)]);

        let err = Distributor::default()
            .disperse_fungible(&mut host, &CallContext::new(addr(1)), &CONTRACT, &TOKEN, &batch)
            .unwrap_err();
        assert!(matches!(err, DisperseError::ValueMismatch { expected: 250, actual: 200 }));
    }

    #[test]
    fn fungible_rejects_attached_value_and_zero_asset() {
        let mut host = MemoryHost::new();
        let batch = BatchRequest::fixed([(addr(2), 1)]);
        let distributor = Distributor::default();

        let err = distributor
            .disperse_fungible(&mut host, &CallContext::with_value(addr(1), 1), &CONTRACT, &TOKEN, &batch)
            .unwrap_err();
        assert!(matches!(err, DisperseError::UnexpectedValue(1)));

        let err = distributor
            .disperse_fungible(&mut host, &CallContext::new(addr(1)), &CONTRACT, &Address::ZERO, &batch)
            .unwrap_err();
        assert!(matches!(err, DisperseError::ZeroAddressAsset));
    }

    #[test]
    fn zero_allowance_is_an_allowance_failure_in_both_modes() {
        let mut host = host_with_token(addr(1), 100);
        let distributor = Distributor::default();
        let ctx = CallContext::new(addr(1));

        let pct = BatchRequest::percentage([(addr(2), 1_000_000)]);
        let err = distributor
            .disperse_fungible(&mut host, &ctx, &CONTRACT, &TOKEN, &pct)
            .unwrap_err();
        assert!(matches!(err, DisperseError::InsufficientAllowance { required: 1, available: 0 }));
        assert_eq!(err.kind(), ErrorKind::AllowanceFailure);

        let fixed = BatchRequest::fixed([(addr(2), 40), (addr(3), 60)]);
        let err = distributor
            .disperse_fungible(&mut host, &ctx, &CONTRACT, &TOKEN, &fixed)
            .unwrap_err();
        assert!(matches!(err, DisperseError::InsufficientAllowance { required: 100, available: 0 }));

        let all_zero = BatchRequest::fixed([(addr(2), 0)]);
        let err = distributor
            .disperse_fungible(&mut host, &ctx, &CONTRACT, &TOKEN, &all_zero)
            .unwrap_err();
        assert!(matches!(err, DisperseError::InsufficientAllowance { required: 1, available: 0 }));
    }

    #[test]
    fn fungible_fixed_overflowing_amounts_are_a_value_mismatch() {
        let mut host = host_with_token(addr(1), 100);
        host.fungible_mut(&TOKEN).unwrap().approve(&addr(1), &CONTRACT, 100).unwrap();
        let batch = BatchRequest::fixed([(addr(2), u128::MAX), (addr(3), 11)]);

        let err = Distributor::default()
            .disperse_fungible(&mut host, &CallContext::new(addr(1)), &CONTRACT, &TOKEN, &batch)
            .unwrap_err();
        assert!(matches!(err, DisperseError::ValueMismatch { expected: 100, actual: u128::MAX }));
        assert_eq!(err.kind(), ErrorKind::AllocationMismatch);
    }
}
