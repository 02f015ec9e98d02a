//! Per-recipient payout computation.
//!
//! Fixed mode pays the listed amounts verbatim. Percentage mode computes every
//! share independently as `floor(total * weight / 1_000_000)`; it never subtracts
//! from a running remainder, so no recipient absorbs another's rounding. The
//! leftover ("dust") stays with the contract and is strictly less than the
//! number of recipients.

use crate::batch::{AllocationMode, BatchRequest};
use crate::error::DisperseError;
use disperse_types::{ppm_share, PPM_DENOMINATOR};

/// Result of splitting `total` across a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// The authorized total being split.
    pub total: u128,
    /// Amount owed to each recipient, positionally aligned with the batch.
    pub payouts: Vec<u128>,
    /// Sum of `payouts`.
    pub distributed: u128,
    /// `total - distributed`, retained by the contract.
    pub dust: u128,
}

/// Split `total` across `batch` according to its mode.
///
/// The batch must already have passed [`BatchRequest::validate`].
pub fn allocate(batch: &BatchRequest, total: u128) -> Result<Allocation, DisperseError> {
    match batch.mode {
        AllocationMode::Fixed => allocate_fixed(batch, total),
        AllocationMode::Percentage => allocate_percentage(batch, total),
    }
}

fn allocate_fixed(batch: &BatchRequest, total: u128) -> Result<Allocation, DisperseError> {
    let sum = match batch.amounts_sum() {
        Some(sum) if sum == total => sum,
        other => {
            return Err(DisperseError::ValueMismatch {
                expected: total,
                actual: other.unwrap_or(u128::MAX),
            })
        }
    };
    Ok(Allocation {
        total,
        payouts: batch.amounts.clone(),
        distributed: sum,
        dust: 0,
    })
}

fn allocate_percentage(batch: &BatchRequest, total: u128) -> Result<Allocation, DisperseError> {
    match batch.amounts_sum() {
        Some(PPM_DENOMINATOR) => {}
        other => {
            // An overflowing weight sum is reported saturated.
            return Err(DisperseError::WeightSumMismatch {
                expected: PPM_DENOMINATOR,
                actual: other.unwrap_or(u128::MAX),
            });
        }
    }

    let payouts = batch
        .amounts
        .iter()
        .map(|w| ppm_share(total, *w).ok_or(DisperseError::Overflow))
        .collect::<Result<Vec<_>, _>>()?;
    let distributed = payouts
        .iter()
        .try_fold(0u128, |acc, p| acc.checked_add(*p))
        .ok_or(DisperseError::Overflow)?;
    // Each share is floored from an exact fraction of `total`, so the sum cannot exceed it.
    let dust = total - distributed;

    Ok(Allocation {
        total,
        payouts,
        distributed,
        dust,
    })
}
