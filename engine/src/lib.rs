//! Distribution and escrow engine.
//!
//! Two components share one contract address:
//! - the **distributor** splits a native or fungible total across a batch of
//!   recipients, either by fixed amounts or by parts-per-million weights, and
//!   pays everyone out within the same call;
//! - the **escrow ledger** pulls deposits into the contract's custody and keeps a
//!   cumulative, never-decreasing total per depositor and asset.
//!
//! [`DisperseContract`] is the public entry point. Every operation runs as one
//! host transaction: either all transfers and ledger updates apply, or none do.

pub mod allocation;
pub mod batch;
pub mod config;
pub mod contract;
pub mod distributor;
pub mod error;
pub mod escrow;
pub mod transfer;

pub use allocation::{allocate, Allocation};
pub use batch::{AllocationMode, BatchRequest};
pub use config::EngineConfig;
pub use contract::DisperseContract;
pub use distributor::{DisperseReceipt, Distributor, Payout};
pub use error::{DisperseError, ErrorKind};
pub use escrow::{CommitReceipt, Commitment, EscrowLedger};
