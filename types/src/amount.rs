//! Amount conventions.
//!
//! Amounts are raw integer units (`u128`) to avoid floating-point errors.
//! Proportional weights are expressed in parts-per-million.

use crate::error::TypeError;

/// 1,000,000 ppm = 100%.
pub const PPM_DENOMINATOR: u128 = 1_000_000;

/// Raw units in one whole native coin or token (18 decimals).
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// `floor(total * weight / PPM_DENOMINATOR)` without intermediate overflow.
///
/// Splits `total = q * P + r` so the product never exceeds `total` for
/// `weight <= P`. Returns `None` only if `weight > P` makes `q * weight` overflow.
pub fn ppm_share(total: u128, weight: u128) -> Option<u128> {
    let q = total / PPM_DENOMINATOR;
    let r = total % PPM_DENOMINATOR;
    let whole = q.checked_mul(weight)?;
    let frac = r.checked_mul(weight)? / PPM_DENOMINATOR;
    whole.checked_add(frac)
}

/// Parse a decimal amount string (`"1000000000000000000"`).
pub fn parse_amount(s: &str) -> Result<u128, TypeError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypeError::InvalidAmount(s.to_string()));
    }
    trimmed
        .parse::<u128>()
        .map_err(|e| TypeError::InvalidAmount(format!("{s}: {e}")))
}
