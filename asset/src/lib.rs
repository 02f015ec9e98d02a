//! External asset interfaces the distributor and escrow ledger depend on.
//!
//! - [`FungibleAsset`]: allowance-based token contract (pull via `transfer_from`,
//!   push via `transfer`).
//! - [`NativeAsset`]: the chain's base coin, where a recipient may refuse a payment.
//! - [`Host`]: the execution environment that resolves assets and provides
//!   checkpoint/revert so every call applies fully or not at all.
//!
//! [`MemoryHost`] is a complete in-process implementation used by the daemon's
//! development ledger and by tests.

pub mod error;
pub mod fungible;
pub mod host;
pub mod memory;
pub mod native;

pub use error::AssetError;
pub use fungible::FungibleAsset;
pub use host::{atomically, CallContext, Host};
pub use memory::{MemoryHost, MemoryNative, MemoryToken, TokenFault};
pub use native::NativeAsset;
