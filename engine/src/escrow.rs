//! Escrow ledger: deposits held in the contract's custody.
//!
//! `commit` is the only code path that writes to the store, and it only ever
//! increases a total. There is no release or withdrawal path.

use crate::error::DisperseError;
use crate::transfer;
use disperse_asset::{CallContext, Host};
use disperse_store::{CommitRecord, CommitStore};
use disperse_types::{Address, AssetKind};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What a caller is depositing.
///
/// A native commitment carries no amount: the value attached to the call is
/// the only source of truth for how much is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commitment {
    Native,
    Fungible { asset: Address, amount: u128 },
}

impl Commitment {
    /// Adapt the three-argument `(kind, asset, amount)` call form.
    ///
    /// For [`AssetKind::Native`] both `asset` and `amount` are ignored.
    pub fn from_parts(kind: AssetKind, asset: Address, amount: u128) -> Self {
        match kind {
            AssetKind::Native => {
                if amount != 0 || !asset.is_zero() {
                    debug!(%asset, amount, "ignoring asset and amount arguments of a native commit");
                }
                Commitment::Native
            }
            AssetKind::Fungible => Commitment::Fungible { asset, amount },
        }
    }
}

/// Outcome of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    pub account: Address,
    pub kind: AssetKind,
    /// Token contract, `None` for native commits.
    pub asset: Option<Address>,
    pub amount: u128,
    /// The account's cumulative total for this asset after the commit.
    pub new_total: u128,
}

/// Per-depositor ledger over an injected store.
pub struct EscrowLedger<S> {
    store: S,
}

impl<S: CommitStore> EscrowLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pull a deposit into `contract` and credit it to the caller.
    ///
    /// The store is written last, after the asset movement succeeded, so a
    /// failed pull never leaves a ledger increment behind.
    pub fn commit<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        contract: &Address,
        commitment: Commitment,
    ) -> Result<CommitReceipt, DisperseError> {
        let receipt = match commitment {
            Commitment::Native => self.commit_native(host, ctx, contract)?,
            Commitment::Fungible { asset, amount } => {
                self.commit_fungible(host, ctx, contract, asset, amount)?
            }
        };
        info!(
            account = %receipt.account,
            kind = %receipt.kind,
            amount = receipt.amount,
            new_total = receipt.new_total,
            "commit recorded"
        );
        Ok(receipt)
    }

    fn commit_native<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        contract: &Address,
    ) -> Result<CommitReceipt, DisperseError> {
        if ctx.value == 0 {
            return Err(DisperseError::ZeroAmount);
        }
        let current = self.store.get_native_committed(&ctx.caller)?;
        let new_total = current.checked_add(ctx.value).ok_or(DisperseError::Overflow)?;

        transfer::receive_native(host, ctx, contract)?;
        self.store.put_native_committed(&ctx.caller, new_total)?;

        Ok(CommitReceipt {
            account: ctx.caller,
            kind: AssetKind::Native,
            asset: None,
            amount: ctx.value,
            new_total,
        })
    }

    fn commit_fungible<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        contract: &Address,
        asset: Address,
        amount: u128,
    ) -> Result<CommitReceipt, DisperseError> {
        if ctx.value != 0 {
            return Err(DisperseError::UnexpectedValue(ctx.value));
        }
        if asset.is_zero() {
            return Err(DisperseError::ZeroAddressAsset);
        }
        if amount == 0 {
            return Err(DisperseError::ZeroAmount);
        }
        let available = transfer::allowance(host, &asset, &ctx.caller, contract)?;
        if available < amount {
            return Err(DisperseError::InsufficientAllowance {
                required: amount,
                available,
            });
        }
        let current = self.store.get_token_committed(&ctx.caller, &asset)?;
        let new_total = current.checked_add(amount).ok_or(DisperseError::Overflow)?;

        transfer::pull_fungible(host, &asset, &ctx.caller, contract, amount)?;
        self.store.put_token_committed(&ctx.caller, &asset, new_total)?;

        Ok(CommitReceipt {
            account: ctx.caller,
            kind: AssetKind::Fungible,
            asset: Some(asset),
            amount,
            new_total,
        })
    }

    /// Cumulative native value committed by `account`; zero if unknown.
    pub fn get_native_amount(&self, account: &Address) -> u128 {
        self.try_get_native_amount(account).unwrap_or_else(|e| {
            warn!(%account, error = %e, "native commitment lookup failed");
            0
        })
    }

    pub fn try_get_native_amount(&self, account: &Address) -> Result<u128, DisperseError> {
        Ok(self.store.get_native_committed(account)?)
    }

    /// Cumulative amount of `asset` committed by `account`; zero if unknown.
    pub fn get_token_amount(&self, account: &Address, asset: &Address) -> u128 {
        self.try_get_token_amount(account, asset).unwrap_or_else(|e| {
            warn!(%account, %asset, error = %e, "token commitment lookup failed");
            0
        })
    }

    pub fn try_get_token_amount(&self, account: &Address, asset: &Address) -> Result<u128, DisperseError> {
        Ok(self.store.get_token_committed(account, asset)?)
    }

    pub fn get_record(&self, account: &Address) -> Result<CommitRecord, DisperseError> {
        Ok(self.store.get_record(account)?)
    }
}
