//! Opaque state snapshots kept next to the escrow ledger.
//!
//! The escrow totals live in a [`crate::CommitStore`]; the balances backing
//! them live in the host. A deployment that persists one must persist the
//! other, or a restart leaves committed totals without the custody behind them.

use crate::StoreError;

/// A single-slot blob store. The caller owns the encoding.
pub trait SnapshotStore {
    /// The last saved snapshot, or `None` if nothing was ever saved.
    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the stored snapshot.
    fn save_snapshot(&self, bytes: &[u8]) -> Result<(), StoreError>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Box<T> {
    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).load_snapshot()
    }

    fn save_snapshot(&self, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).save_snapshot(bytes)
    }
}
