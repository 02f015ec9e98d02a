//! Distribution and escrow errors.

use disperse_asset::AssetError;
use disperse_store::StoreError;
use disperse_types::Address;
use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a failure, for callers that only need to know
/// whose fault it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed request: lengths, empty batch, zero address, zero amount.
    InputValidation,
    /// Weights or fixed amounts do not add up to the authorized total.
    AllocationMismatch,
    /// An asset push or pull was rejected.
    TransferFailure,
    /// The caller did not pre-authorize enough.
    AllowanceFailure,
    /// Arithmetic overflow or storage failure.
    Internal,
}

#[derive(Debug, Error)]
pub enum DisperseError {
    #[error("recipients ({recipients}) and amounts ({amounts}) differ in length")]
    LengthMismatch { recipients: usize, amounts: usize },

    #[error("batch is empty")]
    EmptyBatch,

    #[error("batch of {len} recipients exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("recipient at index {index} is the zero address")]
    ZeroAddressRecipient { index: usize },

    #[error("asset address is the zero address")]
    ZeroAddressAsset,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("native value ({0}) attached to a call that does not accept it")]
    UnexpectedValue(u128),

    #[error("percentage weights sum to {actual}, expected {expected}")]
    WeightSumMismatch { expected: u128, actual: u128 },

    #[error("amounts sum to {actual}, but {expected} was authorized")]
    ValueMismatch { expected: u128, actual: u128 },

    #[error("allowance too small: need {required}, have {available}")]
    InsufficientAllowance { required: u128, available: u128 },

    #[error("no token contract at {0}")]
    UnknownAsset(Address),

    #[error("transfer to {to} failed: {reason}")]
    TransferFailed { to: Address, reason: String },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DisperseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DisperseError::LengthMismatch { .. }
            | DisperseError::EmptyBatch
            | DisperseError::BatchTooLarge { .. }
            | DisperseError::ZeroAddressRecipient { .. }
            | DisperseError::ZeroAddressAsset
            | DisperseError::ZeroAmount
            | DisperseError::UnexpectedValue(_) => ErrorKind::InputValidation,
            DisperseError::WeightSumMismatch { .. } | DisperseError::ValueMismatch { .. } => {
                ErrorKind::AllocationMismatch
            }
            DisperseError::InsufficientAllowance { .. } => ErrorKind::AllowanceFailure,
            DisperseError::UnknownAsset(_) | DisperseError::TransferFailed { .. } => {
                ErrorKind::TransferFailure
            }
            DisperseError::Overflow | DisperseError::Store(_) => ErrorKind::Internal,
        }
    }

    /// Wrap an asset-level failure of a transfer towards `to`.
    pub fn transfer(to: Address, err: AssetError) -> Self {
        match err {
            AssetError::InsufficientAllowance { needed, available } => {
                DisperseError::InsufficientAllowance {
                    required: needed,
                    available,
                }
            }
            other => DisperseError::TransferFailed {
                to,
                reason: other.to_string(),
            },
        }
    }
}
