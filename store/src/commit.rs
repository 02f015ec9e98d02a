//! Escrow commitment storage trait.

use crate::StoreError;
use disperse_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one depositor has committed to the contract.
///
/// Both totals only ever grow. A record with all-zero totals is
/// indistinguishable from an account that never committed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub account: Address,
    /// Cumulative native value committed.
    pub native_committed: u128,
    /// Cumulative amount committed per token contract address.
    pub token_committed: BTreeMap<Address, u128>,
}

impl CommitRecord {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            ..Default::default()
        }
    }

    pub fn token(&self, asset: &Address) -> u128 {
        self.token_committed.get(asset).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.native_committed == 0 && self.token_committed.values().all(|v| *v == 0)
    }
}

/// Trait for escrow ledger storage.
///
/// Reads of unknown keys return zero rather than an error. Writes replace
/// the stored total; accumulation is the caller's job.
pub trait CommitStore {
    fn get_native_committed(&self, account: &Address) -> Result<u128, StoreError>;
    fn put_native_committed(&self, account: &Address, total: u128) -> Result<(), StoreError>;

    fn get_token_committed(&self, account: &Address, asset: &Address) -> Result<u128, StoreError>;
    fn put_token_committed(
        &self,
        account: &Address,
        asset: &Address,
        total: u128,
    ) -> Result<(), StoreError>;

    /// Assemble the full record for one account.
    fn get_record(&self, account: &Address) -> Result<CommitRecord, StoreError>;

    /// Number of accounts with a stored native total or at least one token total.
    fn account_count(&self) -> Result<u64, StoreError>;
}

impl<T: CommitStore + ?Sized> CommitStore for Box<T> {
    fn get_native_committed(&self, account: &Address) -> Result<u128, StoreError> {
        (**self).get_native_committed(account)
    }

    fn put_native_committed(&self, account: &Address, total: u128) -> Result<(), StoreError> {
        (**self).put_native_committed(account, total)
    }

    fn get_token_committed(&self, account: &Address, asset: &Address) -> Result<u128, StoreError> {
        (**self).get_token_committed(account, asset)
    }

    fn put_token_committed(
        &self,
        account: &Address,
        asset: &Address,
        total: u128,
    ) -> Result<(), StoreError> {
        (**self).put_token_committed(account, asset, total)
    }

    fn get_record(&self, account: &Address) -> Result<CommitRecord, StoreError> {
        (**self).get_record(account)
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        (**self).account_count()
    }
}
