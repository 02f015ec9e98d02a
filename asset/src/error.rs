//! Asset-level failures raised by token contracts and the native ledger.

use disperse_types::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("transfer involving the zero address")]
    ZeroAddress,

    #[error("balance overflow")]
    Overflow,

    #[error("call reverted: {0}")]
    Reverted(String),

    #[error("host snapshot: {0}")]
    Snapshot(String),
}
