use alloy::primitives::U256;

use crate::{
    core::word::{self, as_usize},
    error::Error,
};

use super::super::{execution::Control, frame::Frame};

/// AND - Bitwise AND operation
pub fn and(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a & b)?;
    Ok(Control::Continue)
}

/// OR - Bitwise OR operation
pub fn or(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a | b)?;
    Ok(Control::Continue)
}

/// XOR - Bitwise XOR operation
pub fn xor(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a ^ b)?;
    Ok(Control::Continue)
}

/// NOT - Bitwise NOT operation
pub fn not(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    frame.stack.push(!a)?;
    Ok(Control::Continue)
}

/// BYTE - Retrieve single byte from word
pub fn byte(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let index = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    frame.stack.push(word::byte(index, value))?;
    Ok(Control::Continue)
}

/// SHL - Shift left operation
pub fn shl(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let shift = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    let result = match as_usize(shift) {
        Some(shift) if shift < 256 => value << shift,
        _ => U256::ZERO,
    };
    frame.stack.push(result)?;
    Ok(Control::Continue)
}

/// SHR - Shift right operation
pub fn shr(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let shift = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    let result = match as_usize(shift) {
        Some(shift) if shift < 256 => value >> shift,
        _ => U256::ZERO,
    };
    frame.stack.push(result)?;
    Ok(Control::Continue)
}

/// SAR - Arithmetic shift right operation
pub fn sar(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let shift = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    frame.stack.push(word::sar(shift, value))?;
    Ok(Control::Continue)
}
