//! Abstract storage traits for the escrow ledger and host snapshots.
//!
//! Every storage backend (LMDB, in-memory) implements these traits.
//! The rest of the codebase depends only on the traits.

pub mod commit;
pub mod error;
pub mod memory;
pub mod snapshot;

pub use commit::{CommitRecord, CommitStore};
pub use error::StoreError;
pub use memory::{MemoryCommitStore, MemorySnapshotStore};
pub use snapshot::SnapshotStore;
