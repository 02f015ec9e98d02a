//! Account and contract address type.

use crate::error::TypeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account or contract address.
///
/// Rendered as `0x`-prefixed lowercase hex. The all-zero address is the null
/// address and is never a valid recipient.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an address from a byte slice of exactly [`Address::LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| TypeError::InvalidAddress(format!("expected 20 bytes, got {}", bytes.len())))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    /// Parse a hex address, with or without the `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != Self::LEN * 2 {
            return Err(TypeError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| TypeError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Address>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_lowercase_hex() {
        let addr = Address::new([0xab; 20]);
        assert_eq!(addr.to_string(), format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn parse_accepts_with_and_without_prefix() {
        let hex = "00112233445566778899aabbccddeeff00112233";
        let a: Address = format!("0x{hex}").parse().unwrap();
        let b: Address = hex.parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes()[1], 0x11);
    }

    #[test]
    fn parse_rejects_bad_length_and_digits() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!(format!("0x{}", "zz".repeat(20)).parse::<Address>().is_err());
    }

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1; 20]).is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(Address::from_slice(&[7u8; 19]).is_err());
        assert_eq!(Address::from_slice(&[7u8; 20]).unwrap(), Address::new([7; 20]));
    }

    #[test]
    fn json_uses_hex_string() {
        let addr = Address::new([0x01; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
