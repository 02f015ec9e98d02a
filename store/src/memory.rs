//! Volatile stores for deployments without a data directory.

use crate::{CommitRecord, CommitStore, SnapshotStore, StoreError};
use disperse_types::Address;
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryCommitStore {
    native: RwLock<BTreeMap<Address, u128>>,
    /// Keyed by `(account, asset)` so one account's tokens are a contiguous range.
    tokens: RwLock<BTreeMap<(Address, Address), u128>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Poisoned
}

impl MemoryCommitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommitStore for MemoryCommitStore {
    fn get_native_committed(&self, account: &Address) -> Result<u128, StoreError> {
        let native = self.native.read().map_err(poisoned)?;
        Ok(native.get(account).copied().unwrap_or(0))
    }

    fn put_native_committed(&self, account: &Address, total: u128) -> Result<(), StoreError> {
        self.native.write().map_err(poisoned)?.insert(*account, total);
        Ok(())
    }

    fn get_token_committed(&self, account: &Address, asset: &Address) -> Result<u128, StoreError> {
        let tokens = self.tokens.read().map_err(poisoned)?;
        Ok(tokens.get(&(*account, *asset)).copied().unwrap_or(0))
    }

    fn put_token_committed(
        &self,
        account: &Address,
        asset: &Address,
        total: u128,
    ) -> Result<(), StoreError> {
        self.tokens.write().map_err(poisoned)?.insert((*account, *asset), total);
        Ok(())
    }

    fn get_record(&self, account: &Address) -> Result<CommitRecord, StoreError> {
        let mut record = CommitRecord::new(*account);
        record.native_committed = self.get_native_committed(account)?;
        let tokens = self.tokens.read().map_err(poisoned)?;
        record.token_committed = tokens
            .range((*account, Address::ZERO)..)
            .take_while(|((owner, _), _)| owner == account)
            .map(|((_, asset), total)| (*asset, *total))
            .collect();
        Ok(record)
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        let native = self.native.read().map_err(poisoned)?;
        let tokens = self.tokens.read().map_err(poisoned)?;
        let mut accounts: Vec<&Address> = native.keys().collect();
        accounts.extend(tokens.keys().map(|(owner, _)| owner));
        accounts.sort();
        accounts.dedup();
        Ok(accounts.len() as u64)
    }
}

/// Volatile `SnapshotStore`; holds the last saved blob until dropped.
#[derive(Default)]
pub struct MemorySnapshotStore {
    slot: RwLock<Option<Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.slot.read().map_err(poisoned)?.clone())
    }

    fn save_snapshot(&self, bytes: &[u8]) -> Result<(), StoreError> {
        *self.slot.write().map_err(poisoned)? = Some(bytes.to_vec());
        Ok(())
    }
}
