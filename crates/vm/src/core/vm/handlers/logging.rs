use alloy::primitives::B256;

use crate::{
    core::{log::Log, opcodes::LOG0, word::to_b256},
    error::Error,
};

use super::super::{execution::Control, frame::Frame};

/// LOG0-LOG4 - Append log record with N topics
pub fn log_n(frame: &mut Frame<'_>) -> Result<Control, Error> {
    let topic_count = (frame.opcode()? - LOG0) as usize;

    let data = frame.pop_memory_range()?;
    let topics: Vec<B256> = frame.stack.pop_n(topic_count)?.into_iter().map(to_b256).collect();

    frame.world.emit(Log::new(frame.context.address, topics, &data));
    Ok(Control::Continue)
}
