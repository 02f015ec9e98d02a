//! The ledger-holding unit that owns both the distributor and the escrow ledger.

use crate::batch::BatchRequest;
use crate::config::EngineConfig;
use crate::distributor::{DisperseReceipt, Distributor};
use crate::error::DisperseError;
use crate::escrow::{CommitReceipt, Commitment, EscrowLedger};
use disperse_asset::{atomically, CallContext, Host};
use disperse_store::{CommitRecord, CommitStore};
use disperse_types::Address;
use tracing::warn;

/// Public entry point: one contract address, one escrow store.
///
/// Each mutating operation runs inside [`atomically`]: on any error the host is
/// restored to the checkpoint taken at the start of the call.
pub struct DisperseContract<S> {
    address: Address,
    distributor: Distributor,
    escrow: EscrowLedger<S>,
}

impl<S: CommitStore> DisperseContract<S> {
    pub fn new(address: Address, config: EngineConfig, store: S) -> Self {
        Self {
            address,
            distributor: Distributor::new(config),
            escrow: EscrowLedger::new(store),
        }
    }

    /// The address holding custody of escrowed funds and dispersal dust.
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn escrow(&self) -> &EscrowLedger<S> {
        &self.escrow
    }

    pub fn disperse_native<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        batch: &BatchRequest,
    ) -> Result<DisperseReceipt, DisperseError> {
        self.execute(host, ctx, "disperse_native", |h| {
            self.distributor.disperse_native(h, ctx, &self.address, batch)
        })
    }

    pub fn disperse_fungible<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        asset: &Address,
        batch: &BatchRequest,
    ) -> Result<DisperseReceipt, DisperseError> {
        self.execute(host, ctx, "disperse_fungible", |h| {
            self.distributor.disperse_fungible(h, ctx, &self.address, asset, batch)
        })
    }

    pub fn commit<H: Host>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        commitment: Commitment,
    ) -> Result<CommitReceipt, DisperseError> {
        self.execute(host, ctx, "commit", |h| {
            self.escrow.commit(h, ctx, &self.address, commitment)
        })
    }

    /// `getEthAmount`: cumulative native value committed by `account`.
    pub fn get_native_amount(&self, account: &Address) -> u128 {
        self.escrow.get_native_amount(account)
    }

    /// `getTokenAmount`: cumulative amount of `asset` committed by `account`.
    pub fn get_token_amount(&self, account: &Address, asset: &Address) -> u128 {
        self.escrow.get_token_amount(account, asset)
    }

    pub fn get_commit_record(&self, account: &Address) -> Result<CommitRecord, DisperseError> {
        self.escrow.get_record(account)
    }

    fn execute<H, T, F>(&self, host: &mut H, ctx: &CallContext, op: &'static str, f: F) -> Result<T, DisperseError>
    where
        H: Host,
        F: FnOnce(&mut H) -> Result<T, DisperseError>,
    {
        atomically(host, f).map_err(|e| {
            warn!(op, caller = %ctx.caller, kind = ?e.kind(), error = %e, "invocation reverted");
            e
        })
    }
}
