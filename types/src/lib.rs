//! Fundamental types for the disperse/collect workspace.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, asset selectors, and the parts-per-million fixed-point scale.

pub mod address;
pub mod amount;
pub mod asset;
pub mod error;

pub use address::Address;
pub use amount::{parse_amount, ppm_share, PPM_DENOMINATOR, UNIT};
pub use asset::AssetKind;
pub use error::TypeError;
