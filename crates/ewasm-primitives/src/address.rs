//! 20-byte account address

use crate::error::PrimitiveError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ethereum-style 20-byte address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 20;

    /// Zero address (0x0000...0000)
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, PrimitiveError> {
        let bytes: [u8; 20] = slice.try_into().map_err(|_| PrimitiveError::InvalidLength {
            expected: Self::LEN,
            actual: slice.len(),
        })?;
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, PrimitiveError> {
        let s = crate::hex::strip_prefix(s.trim());
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }

    /// Get as byte array
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        crate::hex::encode_hex(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALLER: &str = "0x5d48c1018904a172886829bbbd9c6f4a2d06c47b";

    #[test]
    fn test_address_from_hex() {
        let addr = Address::from_hex(CALLER).unwrap();
        assert!(!addr.is_zero());
        assert_eq!(addr.as_bytes()[0], 0x5d);
        assert_eq!(addr.as_bytes()[19], 0x7b);

        let unprefixed = Address::from_hex(&CALLER[2..]).unwrap();
        assert_eq!(addr, unprefixed);
    }

    #[test]
    fn test_address_mixed_case() {
        let lower = Address::from_hex(CALLER).unwrap();
        let upper = Address::from_hex(&CALLER.to_uppercase().replace("0X", "0x")).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_address_invalid_length() {
        match Address::from_hex("0x5d48c1018904a172886829bbbd9c6f4a2d06c4") {
            Err(PrimitiveError::InvalidLength { expected: 20, actual: 19 }) => {}
            other => panic!("expected InvalidLength, got {:?}", other),
        }
        match Address::from_hex("0x") {
            Err(PrimitiveError::InvalidLength { actual: 0, .. }) => {}
            other => panic!("expected InvalidLength, got {:?}", other),
        }
    }

    #[test]
    fn test_address_invalid_hex() {
        assert!(matches!(
            Address::from_hex("0x5d48c1018904a172886829bbbd9c6f4a2d06c4zz"),
            Err(PrimitiveError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(Address::default(), Address::ZERO);
        assert_eq!(
            Address::ZERO.to_hex(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_address_display_and_debug() {
        let addr: Address = CALLER.parse().unwrap();
        assert_eq!(addr.to_string(), CALLER);
        assert_eq!(format!("{:?}", addr), format!("Address({})", CALLER));
    }

    #[test]
    fn test_address_serde() {
        let json = format!("\"{}\"", CALLER);
        let addr: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr.to_hex(), CALLER);
        assert_eq!(serde_json::to_string(&addr).unwrap(), json);

        let bad: Result<Address, _> = serde_json::from_str("\"0x1234\"");
        assert!(bad.is_err());
    }
}
