use alloy::primitives::{keccak256, U256};

use crate::error::Error;

use super::super::{execution::Control, frame::Frame};

/// SHA3 - Compute Keccak-256 hash
pub fn sha3(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let data = frame.pop_memory_range()?;
    frame.stack.push(U256::from_be_bytes(keccak256(data).0))?;
    Ok(Control::Continue)
}
