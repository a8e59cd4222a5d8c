use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// 20-byte account address.
///
/// Parsed from `0x`-prefixed hex of any letter case. Equality is over the raw
/// bytes, so two textual forms that differ only in case (checksummed vs.
/// lowercase) compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Abbreviated form for compact listings: `0x1234...abcd`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ValidationError::InvalidAddress(s.to_string()))?;

        if digits.len() != 40 {
            return Err(ValidationError::InvalidAddress(s.to_string()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| ValidationError::InvalidAddress(s.to_string()))?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x75faf114eafb1BDbe2F0316DF893fd58CE46AA4d";

    #[test]
    fn parse_is_case_insensitive() {
        let mixed: Address = CHECKSUMMED.parse().unwrap();
        let lower: Address = CHECKSUMMED.to_lowercase().parse().unwrap();
        let upper: Address = format!("0x{}", &CHECKSUMMED[2..].to_uppercase())
            .parse()
            .unwrap();

        assert_eq!(mixed, lower);
        assert_eq!(mixed, upper);
    }

    #[test]
    fn display_is_lowercase_hex() {
        let addr: Address = CHECKSUMMED.parse().unwrap();
        assert_eq!(addr.to_string(), CHECKSUMMED.to_lowercase());
        assert_eq!(addr.short(), "0x75fa...aa4d");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "0x", "75faf114eafb1BDbe2F0316DF893fd58CE46AA4d", "0x1234", "0xZZfaf114eafb1BDbe2F0316DF893fd58CE46AA4d"] {
            assert!(
                matches!(bad.parse::<Address>(), Err(ValidationError::InvalidAddress(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_bytes([1u8; 20]).is_zero());
    }
}
