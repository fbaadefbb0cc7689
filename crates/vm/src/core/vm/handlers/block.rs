use alloy::primitives::U256;

use crate::{
    core::word::{from_address, from_b256},
    error::Error,
};

use super::super::{execution::Control, frame::Frame};

/// BLOCKHASH - Get the hash of one of the 256 most recent complete blocks
pub fn blockhash(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let requested = frame.stack.pop()?;
    let hash = frame.world.state().block_hash(requested, frame.block.number);
    frame.stack.push(from_b256(hash))?;
    Ok(Control::Continue)
}

/// COINBASE - Get the block's beneficiary address
pub fn coinbase(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(from_address(frame.block.coinbase))?;
    Ok(Control::Continue)
}

/// TIMESTAMP - Get the block's timestamp
pub fn timestamp(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.block.timestamp))?;
    Ok(Control::Continue)
}

/// NUMBER - Get the block's number
pub fn number(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.block.number))?;
    Ok(Control::Continue)
}

/// DIFFICULTY - Get the block's difficulty, PREVRANDAO after the merge
pub fn difficulty(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(frame.block.difficulty)?;
    Ok(Control::Continue)
}

/// GASLIMIT - Get the block's gas limit
pub fn gaslimit(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.block.gas_limit))?;
    Ok(Control::Continue)
}

/// CHAINID - Get the chain ID
pub fn chainid(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(U256::from(frame.block.chain_id))?;
    Ok(Control::Continue)
}

/// BASEFEE - Get the base fee
pub fn basefee(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(frame.block.base_fee)?;
    Ok(Control::Continue)
}

/// BLOBHASH - Get a versioned blob hash. Transactions here carry no blobs, so it is always 0
pub fn blobhash(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.pop()?;
    frame.stack.push(U256::ZERO)?;
    Ok(Control::Continue)
}

/// BLOBBASEFEE - Get the blob base fee
pub fn blobbasefee(frame: &mut Frame<'_>) -> Result<Control, Error> {
    frame.stack.push(frame.block.blob_base_fee)?;
    Ok(Control::Continue)
}
