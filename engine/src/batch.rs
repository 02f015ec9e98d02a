//! Batch requests and their structural validation.

use crate::config::EngineConfig;
use crate::error::DisperseError;
use disperse_types::Address;
use serde::{Deserialize, Serialize};

/// How `amounts` in a batch are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Absolute amounts; they must add up to the authorized total exactly.
    Fixed,
    /// Parts-per-million weights; they must add up to 1,000,000.
    Percentage,
}

impl AllocationMode {
    pub fn from_is_percentage(is_percentage: bool) -> Self {
        if is_percentage {
            AllocationMode::Percentage
        } else {
            AllocationMode::Fixed
        }
    }
}

/// One invocation's recipients and their amounts or weights.
///
/// Pairs are positional: `amounts[i]` belongs to `recipients[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub recipients: Vec<Address>,
    pub amounts: Vec<u128>,
    pub mode: AllocationMode,
}

impl BatchRequest {
    pub fn new(recipients: Vec<Address>, amounts: Vec<u128>, is_percentage: bool) -> Self {
        Self {
            recipients,
            amounts,
            mode: AllocationMode::from_is_percentage(is_percentage),
        }
    }

    pub fn fixed(pairs: impl IntoIterator<Item = (Address, u128)>) -> Self {
        let (recipients, amounts) = pairs.into_iter().unzip();
        Self {
            recipients,
            amounts,
            mode: AllocationMode::Fixed,
        }
    }

    pub fn percentage(pairs: impl IntoIterator<Item = (Address, u128)>) -> Self {
        let (recipients, amounts) = pairs.into_iter().unzip();
        Self {
            recipients,
            amounts,
            mode: AllocationMode::Percentage,
        }
    }

    /// Structural checks that need no knowledge of the total.
    ///
    /// Order: length mismatch, empty, too large, zero-address recipient.
    pub fn validate(&self, config: &EngineConfig) -> Result<(), DisperseError> {
        if self.recipients.len() != self.amounts.len() {
            return Err(DisperseError::LengthMismatch {
                recipients: self.recipients.len(),
                amounts: self.amounts.len(),
            });
        }
        if self.recipients.is_empty() {
            return Err(DisperseError::EmptyBatch);
        }
        if self.recipients.len() > config.max_recipients {
            return Err(DisperseError::BatchTooLarge {
                len: self.recipients.len(),
                max: config.max_recipients,
            });
        }
        if let Some(index) = self.recipients.iter().position(Address::is_zero) {
            return Err(DisperseError::ZeroAddressRecipient { index });
        }
        Ok(())
    }

    /// Sum of `amounts`, or `None` when it does not fit in a `u128`.
    ///
    /// A sum that overflows can never equal a required total, so callers treat
    /// `None` as a mismatch rather than an internal fault.
    pub fn amounts_sum(&self) -> Option<u128> {
        self.amounts.iter().try_fold(0u128, |acc, a| acc.checked_add(*a))
    }
}
