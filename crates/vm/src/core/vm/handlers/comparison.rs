use alloy::primitives::U256;

use crate::{core::word, error::Error};

use super::super::{execution::Control, frame::Frame};

fn compare(frame: &mut Frame<'_>, predicate: fn(U256, U256) -> bool) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push_bool(predicate(a, b))?;
    Ok(Control::Continue)
}

/// LT - Less than comparison
pub fn lt(frame: &mut Frame<'_>) -> Result<Control, Error> {
    compare(frame, |a, b| a < b)
}

/// GT - Greater than comparison
pub fn gt(frame: &mut Frame<'_>) -> Result<Control, Error> {
    compare(frame, |a, b| a > b)
}

/// SLT - Signed less than comparison
pub fn slt(frame: &mut Frame<'_>) -> Result<Control, Error> {
    compare(frame, word::slt)
}

/// SGT - Signed greater than comparison
pub fn sgt(frame: &mut Frame<'_>) -> Result<Control, Error> {
    compare(frame, |a, b| word::slt(b, a))
}

/// EQ - Equality comparison
pub fn eq(frame: &mut Frame<'_>) -> Result<Control, Error> {
    compare(frame, |a, b| a == b)
}

/// ISZERO - Check if zero
pub fn iszero(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let a = frame.stack.pop()?;
    frame.stack.push_bool(a.is_zero())?;
    Ok(Control::Continue)
}
