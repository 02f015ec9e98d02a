//! Nullable infrastructure for deterministic testing.
//!
//! Storage and the execution host are abstracted behind traits. This crate
//! provides test-friendly implementations that:
//! - Keep everything in memory and never touch the filesystem
//! - Can be told to fail on demand
//! - Come pre-seeded with predictable accounts and balances
//!
//! Usage: swap real implementations for nullables in tests.

pub mod fixtures;
pub mod store;

pub use fixtures::{test_address, HostBuilder};
pub use store::NullCommitStore;
