use alloy::primitives::U256;

use crate::{
    core::{opcodes::JUMPDEST, word::as_usize},
    error::Error,
};

use super::super::{
    execution::{Control, Halt},
    frame::Frame,
};

/// Checks that `destination` is inside the code and lands on a JUMPDEST byte.
fn validate_jump(frame: &Frame<'_>, destination: U256) -> Result<usize, Error> {
    let target = as_usize(destination)
        .filter(|target| *target < frame.code.len())
        .ok_or(Error::JumpOutOfBounds(destination))?;

    if frame.code[target] != JUMPDEST {
        return Err(Error::InvalidJumpDestination(target));
    }
    Ok(target)
}

/// STOP - Halts execution
pub fn stop(_frame: &mut Frame<'_>) -> Result<Control, Error> {
    Ok(Control::Halt(Halt::Stop))
}

/// JUMP - Alter the program counter
pub fn jump(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let destination = frame.stack.pop()?;
    Ok(Control::Jump(validate_jump(frame, destination)?))
}

/// JUMPI - Conditionally alter the program counter
///
/// The destination is only validated when the jump is taken.
pub fn jumpi(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let destination = frame.stack.pop()?;
    let condition = frame.stack.pop()?;

    if condition.is_zero() {
        return Ok(Control::Continue);
    }
    Ok(Control::Jump(validate_jump(frame, destination)?))
}

/// JUMPDEST - Mark a valid destination for jumps (no-op)
pub fn jumpdest(_frame: &mut Frame<'_>) -> Result<Control, Error> {
    Ok(Control::Continue)
}

/// PC - Get the value of the program counter prior to the increment
pub fn pc(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.pc))?;
    Ok(Control::Continue)
}

/// GAS - Get the amount of available gas
///
/// Gas is never consumed, so this is always the frame's full allowance.
pub fn gas(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.context.gas))?;
    Ok(Control::Continue)
}
