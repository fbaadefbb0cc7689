use alloy::primitives::U256;

use crate::{
    core::opcodes::{immediate_size, DUP1, SWAP1},
    error::Error,
};

use super::super::{execution::Control, frame::Frame};

/// POP - Remove item from stack
pub fn pop(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.pop()?;
    Ok(Control::Continue)
}

/// PUSH0 - Push 0 onto stack
pub fn push0(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::ZERO)?;
    Ok(Control::Continue)
}

/// PUSH1-PUSH32 - Push N bytes onto stack
///
/// The immediate must lie entirely within the code.
pub fn push_n(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let size = immediate_size(frame.opcode()?);
    let start = frame.pc + 1;
    let end = start + size;
    if end > frame.code.len() {
        return Err(Error::ProgramCounterOutOfBounds(end));
    }

    frame.stack.push_bytes(&frame.code[start..end])?;
    Ok(Control::Advance(size + 1))
}

/// DUP1-DUP16 - Duplicate Nth stack item
pub fn dup_n(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let n = (frame.opcode()? - DUP1) as usize + 1;
    frame.stack.dup(n)?;
    Ok(Control::Continue)
}

/// SWAP1-SWAP16 - Exchange 1st and Nth stack items
pub fn swap_n(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let n = (frame.opcode()? - SWAP1) as usize + 1;
    frame.stack.swap(n)?;
    Ok(Control::Continue)
}
