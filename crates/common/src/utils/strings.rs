use std::{fmt::Write, str::FromStr};

use alloy::primitives::U256;
use eyre::{bail, eyre, Result};

/// Decodes a hex string into a vector of bytes
///
/// ```
/// use kiln_common::utils::strings::decode_hex;
///
/// let hex = "48656c6c6f20576f726c64"; // "Hello World" in hex
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]);
/// ```
pub fn decode_hex(mut s: &str) -> Result<Vec<u8>> {
    // normalize
    s = s.trim();
    s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

    if s.is_empty() {
        return Ok(vec![]);
    }

    if s.len() % 2 != 0 {
        bail!("invalid hex string: odd number of digits ({})", s.len());
    }

    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| eyre!("invalid hex string: {}", s))
}

/// Encodes a vector of bytes into a hex string
///
/// ```
/// use kiln_common::utils::strings::encode_hex;
///
/// let bytes = vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
/// let result = encode_hex(&bytes);
/// assert_eq!(result, "48656c6c6f20576f726c64");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::new(), |mut acc, b| {
        write!(acc, "{b:02x}").expect("unable to write");
        acc
    })
}

/// Encodes a U256 into a hex string, removing leading zeros
///
/// ```
/// use kiln_common::utils::strings::encode_hex_reduced;
/// use alloy::primitives::U256;
///
/// let result = encode_hex_reduced(U256::MAX);
/// assert_eq!(result, "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");
/// assert_eq!(encode_hex_reduced(U256::ZERO), "0");
/// ```
pub fn encode_hex_reduced(s: U256) -> String {
    if s.is_zero() {
        return String::from("0");
    }

    format!("{s:#x}")
}

/// Parses a word from either a decimal or a `0x`-prefixed hex string.
///
/// ```
/// use kiln_common::utils::strings::parse_word;
/// use alloy::primitives::U256;
///
/// assert_eq!(parse_word("0x10").expect("valid word"), U256::from(16));
/// assert_eq!(parse_word("16").expect("valid word"), U256::from(16));
/// ```
pub fn parse_word(s: &str) -> Result<U256> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str(s).map_err(|e| eyre!("invalid word '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_with_prefix() {
        assert_eq!(decode_hex("0x6001").expect("failed to decode hex"), vec![0x60, 0x01]);
        assert_eq!(decode_hex("  6001\n").expect("failed to decode hex"), vec![0x60, 0x01]);
    }

    #[test]
    fn test_decode_hex_empty() {
        assert!(decode_hex("0x").expect("failed to decode hex").is_empty());
        assert!(decode_hex("").expect("failed to decode hex").is_empty());
    }

    #[test]
    fn test_decode_hex_invalid() {
        assert!(decode_hex("0x600").is_err());
        assert!(decode_hex("zz").is_err());
    }

    #[test]
    fn test_encode_hex_reduced() {
        assert_eq!(encode_hex_reduced(U256::from(0x1234)), "0x1234");
    }

    #[test]
    fn test_parse_word_invalid() {
        assert!(parse_word("0xzz").is_err());
        assert_eq!(parse_word("").expect("empty word is zero"), U256::ZERO);
    }
}
