use alloy::primitives::U256;

use crate::{core::word, error::Error};

use super::super::{execution::Control, frame::Frame};

/// ADD - Addition operation
pub fn add(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.wrapping_add(b))?;
    Ok(Control::Continue)
}

/// MUL - Multiplication operation
pub fn mul(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.wrapping_mul(b))?;
    Ok(Control::Continue)
}

/// SUB - Subtraction operation
pub fn sub(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.wrapping_sub(b))?;
    Ok(Control::Continue)
}

/// DIV - Integer division operation
pub fn div(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let numerator = frame.stack.pop()?;
    let denominator = frame.stack.pop()?;
    let result = numerator.checked_div(denominator).unwrap_or(U256::ZERO);
    frame.stack.push(result)?;
    Ok(Control::Continue)
}

/// SDIV - Signed integer division operation
pub fn sdiv(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let numerator = frame.stack.pop()?;
    let denominator = frame.stack.pop()?;
    frame.stack.push(word::sdiv(numerator, denominator))?;
    Ok(Control::Continue)
}

/// MOD - Modulo operation
pub fn modulo(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let modulus = frame.stack.pop()?;
    let result = a.checked_rem(modulus).unwrap_or(U256::ZERO);
    frame.stack.push(result)?;
    Ok(Control::Continue)
}

/// SMOD - Signed modulo operation
pub fn smod(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let modulus = frame.stack.pop()?;
    frame.stack.push(word::smod(a, modulus))?;
    Ok(Control::Continue)
}

/// ADDMOD - Addition modulo operation
pub fn addmod(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    let modulus = frame.stack.pop()?;

    // the intermediate sum is not truncated to 256 bits
    frame.stack.push(a.add_mod(b, modulus))?;
    Ok(Control::Continue)
}

/// MULMOD - Multiplication modulo operation
pub fn mulmod(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    let modulus = frame.stack.pop()?;
    frame.stack.push(a.mul_mod(b, modulus))?;
    Ok(Control::Continue)
}

/// EXP - Exponential operation
pub fn exp(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let base = frame.stack.pop()?;
    let exponent = frame.stack.pop()?;
    frame.stack.push(word::exp(base, exponent))?;
    Ok(Control::Continue)
}

/// SIGNEXTEND - Extend length of two's complement signed integer
pub fn signextend(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let byte_index = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    frame.stack.push(word::signextend(byte_index, value))?;
    Ok(Control::Continue)
}
