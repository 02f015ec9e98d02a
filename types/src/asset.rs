//! Asset selector for commit operations.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which balance path an operation targets.
///
/// The numeric encoding (`Native = 0`, `Fungible = 1`) is the wire form used by
/// the three-argument `commit(kind, asset, amount)` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// The chain's base coin, moved by attaching value to the call.
    Native,
    /// An external token contract, moved through allowance-based pulls.
    Fungible,
}

impl AssetKind {
    pub fn as_u8(&self) -> u8 {
        match self {
            AssetKind::Native => 0,
            AssetKind::Fungible => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Native => "native",
            AssetKind::Fungible => "fungible",
        }
    }
}

impl TryFrom<u8> for AssetKind {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AssetKind::Native),
            1 => Ok(AssetKind::Fungible),
            other => Err(TypeError::UnknownAssetKind(other.to_string())),
        }
    }
}

impl FromStr for AssetKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" | "eth" | "0" => Ok(AssetKind::Native),
            "fungible" | "erc20" | "token" | "1" => Ok(AssetKind::Fungible),
            _ => Err(TypeError::UnknownAssetKind(s.to_string())),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
