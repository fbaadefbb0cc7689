use alloy::primitives::U256;

use crate::{
    core::{
        memory::slice_padded,
        word::{as_usize_saturated, from_address, from_b256},
    },
    error::Error,
};

use super::super::{execution::Control, frame::Frame};

/// ADDRESS - Get address of currently executing account
pub fn address(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(from_address(frame.context.address))?;
    Ok(Control::Continue)
}

/// BALANCE - Get balance of the given account
pub fn balance(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let address = frame.pop_address()?;
    frame.stack.push(frame.world.state().get_balance(&address))?;
    Ok(Control::Continue)
}

/// ORIGIN - Get execution origination address
pub fn origin(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(from_address(frame.context.origin))?;
    Ok(Control::Continue)
}

/// CALLER - Get caller address
pub fn caller(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(from_address(frame.context.caller))?;
    Ok(Control::Continue)
}

/// CALLVALUE - Get deposited value by the instruction/transaction responsible for this execution
pub fn callvalue(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(frame.context.value)?;
    Ok(Control::Continue)
}

/// CALLDATALOAD - Get input data of current environment
pub fn calldataload(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let offset = as_usize_saturated(frame.stack.pop()?);
    let value = slice_padded(&frame.context.data, offset, 32);
    frame.stack.push(U256::from_be_slice(&value))?;
    Ok(Control::Continue)
}

/// CALLDATASIZE - Get size of input data in current environment
pub fn calldatasize(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.context.data.len()))?;
    Ok(Control::Continue)
}

/// CALLDATACOPY - Copy input data in current environment to memory
pub fn calldatacopy(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let data = frame.context.data.clone();
    frame.copy_to_memory(&data)?;
    Ok(Control::Continue)
}

/// CODESIZE - Get size of code running in current environment
pub fn codesize(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.code.len()))?;
    Ok(Control::Continue)
}

/// CODECOPY - Copy code running in current environment to memory
pub fn codecopy(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let code = frame.code.clone();
    frame.copy_to_memory(&code)?;
    Ok(Control::Continue)
}

/// GASPRICE - Get price of gas in current environment
pub fn gasprice(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(frame.context.gas_price)?;
    Ok(Control::Continue)
}

/// EXTCODESIZE - Get size of an account's code
pub fn extcodesize(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let address = frame.pop_address()?;
    let size = frame.world.state().get_code(&address).len();
    frame.stack.push(U256::from(size))?;
    Ok(Control::Continue)
}

/// EXTCODECOPY - Copy an account's code to memory
pub fn extcodecopy(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let address = frame.pop_address()?;
    let code = frame.world.state().get_code(&address);
    frame.copy_to_memory(&code)?;
    Ok(Control::Continue)
}

/// RETURNDATASIZE - Get size of output data from the previous call
pub fn returndatasize(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.return_data.len()))?;
    Ok(Control::Continue)
}

/// RETURNDATACOPY - Copy output data from the previous call to memory
///
/// Reads past the end of the return data are zero-filled, like every other copy.
pub fn returndatacopy(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let data = frame.return_data.clone();
    frame.copy_to_memory(&data)?;
    Ok(Control::Continue)
}

/// EXTCODEHASH - Get hash of an account's code
pub fn extcodehash(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let address = frame.pop_address()?;
    let hash = frame.world.state().get_code_hash(&address);
    frame.stack.push(from_b256(hash))?;
    Ok(Control::Continue)
}

/// SELFBALANCE - Get balance of currently executing account
pub fn selfbalance(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let balance = frame.world.state().get_balance(&frame.context.address);
    frame.stack.push(balance)?;
    Ok(Control::Continue)
}
