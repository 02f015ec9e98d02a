//! HTTP API for the disperse contract.
//!
//! Provides endpoints for:
//! - Native and token dispersal (fixed amounts or ppm weights)
//! - Escrow commits and commitment queries
//! - Token approvals and balance queries against the development ledger
//!
//! Amounts are decimal strings so full `u128` values survive JSON clients.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, AppState, Ledger, RpcServer, SharedSnapshots, SharedStore};
