use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// The [`Log`] struct represents a log emitted by a `LOG0-LOG4` opcode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// Address of the contract that emitted the log.
    pub address: Address,

    /// Indexed topics, at most four.
    pub topics: Vec<B256>,

    /// Unindexed payload, read from memory.
    pub data: Bytes,
}

impl Log {
    /// Creates a new [`Log`] with the given emitter, topics, and data.
    pub fn new(address: Address, topics: Vec<B256>, data: &[u8]) -> Log {
        Log { address, topics, data: Bytes::copy_from_slice(data) }
    }
}
