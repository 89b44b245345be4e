//! Hex string helpers
//!
//! Test definitions write every byte value as a `0x`-prefixed hex string. The
//! prefix is optional and odd-length strings are read as if they had one
//! leading zero nibble, so `"0x1"` and `"0x01"` decode to the same byte.

use crate::error::PrimitiveError;

/// Strip an optional `0x`/`0X` prefix
pub fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string into bytes
pub fn decode_hex(s: &str) -> Result<Vec<u8>, PrimitiveError> {
    let digits = strip_prefix(s.trim());
    if digits.len() % 2 == 1 {
        return Ok(hex::decode(format!("0{}", digits))?);
    }
    Ok(hex::decode(digits)?)
}

/// Encode bytes as a `0x`-prefixed lowercase hex string
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
