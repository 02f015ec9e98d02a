//! Nullable store: in-memory commitment storage with fault injection.

use disperse_store::{CommitRecord, CommitStore, MemoryCommitStore, StoreError};
use disperse_types::Address;
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory escrow store for testing that can be told to fail.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullCommitStore {
    inner: MemoryCommitStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl NullCommitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read return a backend error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write return a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected read failure".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        Ok(())
    }
}

impl CommitStore for NullCommitStore {
    fn get_native_committed(&self, account: &Address) -> Result<u128, StoreError> {
        self.check_read()?;
        self.inner.get_native_committed(account)
    }

    fn put_native_committed(&self, account: &Address, total: u128) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.put_native_committed(account, total)
    }

    fn get_token_committed(&self, account: &Address, asset: &Address) -> Result<u128, StoreError> {
        self.check_read()?;
        self.inner.get_token_committed(account, asset)
    }

    fn put_token_committed(
        &self,
        account: &Address,
        asset: &Address,
        total: u128,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.put_token_committed(account, asset, total)
    }

    fn get_record(&self, account: &Address) -> Result<CommitRecord, StoreError> {
        self.check_read()?;
        self.inner.get_record(account)
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        self.check_read()?;
        self.inner.account_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn unknown_keys_read_zero() {
        let store = NullCommitStore::new();
        assert_eq!(store.get_native_committed(&addr(1)).unwrap(), 0);
        assert_eq!(store.get_token_committed(&addr(1), &addr(2)).unwrap(), 0);
        assert_eq!(store.account_count().unwrap(), 0);
    }

    #[test]
    fn record_collects_only_own_tokens() {
        let store = NullCommitStore::new();
        store.put_native_committed(&addr(1), 5).unwrap();
        store.put_token_committed(&addr(1), &addr(7), 10).unwrap();
        store.put_token_committed(&addr(1), &addr(8), 20).unwrap();
        store.put_token_committed(&addr(2), &addr(7), 99).unwrap();

        let record = store.get_record(&addr(1)).unwrap();
        assert_eq!(record.native_committed, 5);
        assert_eq!(record.token_committed.len(), 2);
        assert_eq!(record.token(&addr(8)), 20);
        assert_eq!(store.account_count().unwrap(), 2);
    }

    #[test]
    fn injected_failures_can_be_cleared() {
        let store = NullCommitStore::new();
        store.fail_writes(true);
        assert!(store.put_native_committed(&addr(1), 1).is_err());
        store.fail_writes(false);
        store.put_native_committed(&addr(1), 1).unwrap();

        store.fail_reads(true);
        assert!(store.get_record(&addr(1)).is_err());
    }
}
