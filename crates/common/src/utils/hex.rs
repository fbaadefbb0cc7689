use super::strings::encode_hex;
use alloy::primitives::{Address, Bytes, FixedBytes, U256};

/// A convenience function which encodes a given EVM type into a sized, lowercase hex string.
pub trait ToLowerHex {
    /// Formats `self` as a `0x`-prefixed lowercase hex string.
    fn to_lower_hex(&self) -> String;
}

impl ToLowerHex for Bytes {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(self))
    }
}

impl ToLowerHex for U256 {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(&self.to_be_bytes::<32>()))
    }
}

impl ToLowerHex for Vec<u8> {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(self))
    }
}

impl ToLowerHex for FixedBytes<32> {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(self.as_slice()))
    }
}

impl ToLowerHex for Address {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(self.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_is_padded() {
        assert_eq!(
            U256::from(1).to_lower_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_bytes_lower_hex() {
        assert_eq!(vec![0xde, 0xad].to_lower_hex(), "0xdead");
        assert_eq!(Bytes::new().to_lower_hex(), "0x");
    }
}
