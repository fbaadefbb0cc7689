use std::fs;

use eyre::{eyre, Result};

use super::strings::decode_hex;

/// Whether `s` is a (possibly `0x`-prefixed) string of hex digits.
pub fn is_hex(s: &str) -> bool {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Given a target, determines whether it is raw bytecode or a path to a file containing
/// bytecode, and returns the decoded bytes.
///
/// ```
/// use kiln_common::utils::bytecode::read_bytecode;
///
/// assert_eq!(read_bytecode("0x6001").expect("valid bytecode"), vec![0x60, 0x01]);
/// ```
pub fn read_bytecode(target: &str) -> Result<Vec<u8>> {
    if is_hex(target) {
        return decode_hex(target);
    }

    let contents = fs::read_to_string(target)
        .map_err(|e| eyre!("failed to open file '{}': {}", target, e))?;
    let contents = contents.split_whitespace().collect::<String>();
    if !is_hex(&contents) {
        return Err(eyre!("file '{}' doesn't contain valid bytecode", target));
    }

    decode_hex(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::io::file::{delete_path, write_file};

    #[test]
    fn test_is_hex() {
        assert!(is_hex("0x6001"));
        assert!(is_hex("6001"));
        assert!(is_hex(""));
        assert!(!is_hex("./code.hex"));
    }

    #[test]
    fn test_read_bytecode_from_file() {
        let path = std::env::temp_dir().join("kiln-common-bytecode-test").join("code.hex");
        let path = path.to_str().expect("temp path is valid utf-8");

        write_file(path, "0x6001\n6000\n55\n").expect("unable to write file");
        assert_eq!(
            read_bytecode(path).expect("failed to read bytecode"),
            vec![0x60, 0x01, 0x60, 0x00, 0x55]
        );
        assert!(delete_path(path));
    }

    #[test]
    fn test_read_bytecode_missing_file() {
        assert!(read_bytecode("/nonexistent/code.hex").is_err());
    }
}
