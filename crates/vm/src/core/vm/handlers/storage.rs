use kiln_common::utils::hex::ToLowerHex;
use tracing::trace;

use crate::error::Error;

use super::super::{execution::Control, frame::Frame};

/// SLOAD - Load word from storage
pub fn sload(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let key = frame.stack.pop()?;
    let value = frame.world.sload(frame.context.address, key);
    frame.stack.push(value)?;
    Ok(Control::Continue)
}

/// SSTORE - Save word to storage
pub fn sstore(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let key = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    trace!(
        address = %frame.context.address,
        "sstore {} = {}",
        key.to_lower_hex(),
        value.to_lower_hex()
    );
    frame.world.sstore(frame.context.address, key, value);
    Ok(Control::Continue)
}

/// TLOAD - Load word from transient storage
pub fn tload(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let key = frame.stack.pop()?;
    let value = frame.world.tload(frame.context.address, key);
    frame.stack.push(value)?;
    Ok(Control::Continue)
}

/// TSTORE - Save word to transient storage
pub fn tstore(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let key = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    frame.world.tstore(frame.context.address, key, value);
    Ok(Control::Continue)
}
