//! Errors raised while constructing or parsing core types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown asset kind: {0}")]
    UnknownAssetKind(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
