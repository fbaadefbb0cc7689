use alloy::primitives::U256;

use crate::{
    core::{memory::region, word::as_usize},
    error::Error,
};

use super::super::{execution::Control, frame::Frame};

fn word_offset(offset: U256) -> Result<usize, Error> {
    as_usize(offset).ok_or(Error::InvalidMemoryOffset(offset))
}

/// MLOAD - Load word from memory
pub fn mload(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let offset = word_offset(frame.stack.pop()?)?;
    let value = frame.memory.load_word(offset)?;
    frame.stack.push(value)?;
    Ok(Control::Continue)
}

/// MSTORE - Save word to memory
pub fn mstore(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let offset = word_offset(frame.stack.pop()?)?;
    let value = frame.stack.pop()?;
    frame.memory.store_word(offset, value)?;
    Ok(Control::Continue)
}

/// MSTORE8 - Save byte to memory
pub fn mstore8(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let offset = word_offset(frame.stack.pop()?)?;
    let value = frame.stack.pop()?;
    frame.memory.store(offset, &[value.byte(0)], 1)?;
    Ok(Control::Continue)
}

/// MSIZE - Get the size of active memory in bytes
pub fn msize(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.memory.size()))?;
    Ok(Control::Continue)
}

/// MCOPY - Copy memory areas
pub fn mcopy(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let destination = frame.stack.pop()?;
    let source = frame.stack.pop()?;
    let size = frame.stack.pop()?;

    let (destination, size) = region(destination, size)?;
    if size > 0 {
        frame.memory.copy_within(destination, word_offset(source)?, size)?;
    }
    Ok(Control::Continue)
}
