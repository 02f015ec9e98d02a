//! LMDB implementation of CommitStore.
//!
//! `native_commits` is keyed by the 20-byte account. `token_commits` is keyed
//! by `account ++ asset` (40 bytes), so one account's token totals form a
//! contiguous range. Values are bincode-encoded `u128`.

use std::collections::BTreeSet;
use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use disperse_store::{CommitRecord, CommitStore, StoreError};
use disperse_types::Address;

use crate::LmdbError;

pub struct LmdbCommitStore {
    pub(crate) env: Arc<Env>,
    pub(crate) native_db: Database<Bytes, Bytes>,
    pub(crate) token_db: Database<Bytes, Bytes>,
}

fn token_key(account: &Address, asset: &Address) -> [u8; 40] {
    let mut key = [0u8; 40];
    key[..20].copy_from_slice(account.as_bytes());
    key[20..].copy_from_slice(asset.as_bytes());
    key
}

/// Smallest byte string greater than every string starting with `prefix`.
/// Returns `false` if the prefix is all `0xff` and has no successor.
fn increment_prefix(prefix: &mut Vec<u8>) -> bool {
    while let Some(last) = prefix.pop() {
        if last < u8::MAX {
            prefix.push(last + 1);
            return true;
        }
    }
    false
}

fn decode_total(bytes: &[u8]) -> Result<u128, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

impl LmdbCommitStore {
    fn get(&self, db: &Database<Bytes, Bytes>, key: &[u8]) -> Result<u128, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match db.get(&rtxn, key)? {
            Some(bytes) => decode_total(bytes),
            None => Ok(0),
        }
    }

    fn put(&self, db: &Database<Bytes, Bytes>, key: &[u8], total: u128) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(&total)?;
        let mut wtxn = self.env.write_txn()?;
        db.put(&mut wtxn, key, &bytes)?;
        wtxn.commit()?;
        Ok(())
    }
}

impl CommitStore for LmdbCommitStore {
    fn get_native_committed(&self, account: &Address) -> Result<u128, StoreError> {
        Ok(self.get(&self.native_db, account.as_bytes())?)
    }

    fn put_native_committed(&self, account: &Address, total: u128) -> Result<(), StoreError> {
        Ok(self.put(&self.native_db, account.as_bytes(), total)?)
    }

    fn get_token_committed(&self, account: &Address, asset: &Address) -> Result<u128, StoreError> {
        Ok(self.get(&self.token_db, &token_key(account, asset))?)
    }

    fn put_token_committed(
        &self,
        account: &Address,
        asset: &Address,
        total: u128,
    ) -> Result<(), StoreError> {
        Ok(self.put(&self.token_db, &token_key(account, asset), total)?)
    }

    fn get_record(&self, account: &Address) -> Result<CommitRecord, StoreError> {
        let mut record = CommitRecord::new(*account);
        record.native_committed = self.get_native_committed(account)?;

        let prefix = account.as_bytes().as_slice();
        let mut upper = prefix.to_vec();
        let bounded = increment_prefix(&mut upper);
        let bounds = if bounded {
            (Bound::Included(prefix), Bound::Excluded(upper.as_slice()))
        } else {
            (Bound::Included(prefix), Bound::Unbounded)
        };

        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.token_db.range(&rtxn, &bounds).map_err(LmdbError::from)?;
        for result in iter {
            let (key, val) = result.map_err(LmdbError::from)?;
            let asset = Address::from_slice(&key[20..])
                .map_err(|e| LmdbError::Corruption(format!("token key: {e}")))?;
            record.token_committed.insert(asset, decode_total(val)?);
        }
        Ok(record)
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut accounts: BTreeSet<Vec<u8>> = BTreeSet::new();
        for result in self.native_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, _) = result.map_err(LmdbError::from)?;
            accounts.insert(key.to_vec());
        }
        for result in self.token_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, _) = result.map_err(LmdbError::from)?;
            if key.len() != 40 {
                return Err(LmdbError::Corruption(format!("token key of {} bytes", key.len())).into());
            }
            accounts.insert(key[..20].to_vec());
        }
        Ok(accounts.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DEFAULT_MAP_SIZE;
    use crate::LmdbEnvironment;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn open() -> (tempfile::TempDir, LmdbCommitStore) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        (dir, env.commit_store())
    }

    #[test]
    fn unknown_account_reads_zero() {
        let (_dir, store) = open();
        assert_eq!(store.get_native_committed(&addr(1)).unwrap(), 0);
        assert_eq!(store.get_token_committed(&addr(1), &addr(2)).unwrap(), 0);
        assert!(store.get_record(&addr(1)).unwrap().is_empty());
    }

    #[test]
    fn put_overwrites_total() {
        let (_dir, store) = open();
        store.put_native_committed(&addr(1), 5).unwrap();
        store.put_native_committed(&addr(1), u128::MAX).unwrap();
        assert_eq!(store.get_native_committed(&addr(1)).unwrap(), u128::MAX);
    }

    #[test]
    fn record_scan_stops_at_account_boundary() {
        let (_dir, store) = open();
        store.put_token_committed(&addr(1), &addr(7), 10).unwrap();
        store.put_token_committed(&addr(1), &addr(8), 20).unwrap();
        store.put_token_committed(&addr(2), &addr(7), 99).unwrap();
        store.put_token_committed(&addr(0xff), &addr(7), 1).unwrap();
        store.put_native_committed(&addr(3), 4).unwrap();

        let record = store.get_record(&addr(1)).unwrap();
        assert_eq!(record.token_committed.len(), 2);
        assert_eq!(record.token(&addr(7)), 10);
        assert_eq!(record.token(&addr(8)), 20);

        let last = store.get_record(&addr(0xff)).unwrap();
        assert_eq!(last.token(&addr(7)), 1);
        assert_eq!(last.token_committed.len(), 1);

        assert_eq!(store.account_count().unwrap(), 4);
    }

    #[test]
    fn totals_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
            let store = env.commit_store();
            store.put_native_committed(&addr(1), 42).unwrap();
            store.put_token_committed(&addr(1), &addr(7), 50).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let store = env.commit_store();
        assert_eq!(store.get_native_committed(&addr(1)).unwrap(), 42);
        assert_eq!(store.get_token_committed(&addr(1), &addr(7)).unwrap(), 50);
    }

    #[test]
    fn increment_prefix_carries() {
        let mut p = vec![0x01, 0xff];
        assert!(increment_prefix(&mut p));
        assert_eq!(p, vec![0x02]);
        let mut all_max = vec![0xff, 0xff];
        assert!(!increment_prefix(&mut all_max));
    }
}
