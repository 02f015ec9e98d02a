//! LMDB storage backend for the escrow ledger.
//!
//! Implements [`disperse_store::CommitStore`] using the `heed` LMDB bindings.
//! Native and token totals live in two databases within a single environment;
//! a third holds the host snapshot ([`disperse_store::SnapshotStore`]).

pub mod commit;
pub mod environment;
pub mod error;
pub mod snapshot;

pub use commit::LmdbCommitStore;
pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use snapshot::LmdbSnapshotStore;
