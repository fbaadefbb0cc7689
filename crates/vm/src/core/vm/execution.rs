use std::collections::BTreeMap;

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        env::{BlockData, TxData},
        journal::StorageChange,
        log::Log,
        state::{Account, GlobalState},
        storage::Storage,
    },
    error::Error,
};

/// What a handler tells the interpreter loop to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    /// Move on to the next byte.
    Continue,
    /// Skip `n` bytes, the opcode plus its immediates.
    Advance(usize),
    /// Continue at an already validated destination.
    Jump(usize),
    /// Stop the frame.
    Halt(Halt),
}

/// How a frame stopped on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Halt {
    /// STOP, or running off the end of the code.
    Stop,
    /// RETURN with its output.
    Return(Bytes),
    /// REVERT with its output.
    Revert(Bytes),
    /// SELFDESTRUCT.
    SelfDestruct,
}

/// Final state of a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Halted normally; its changes are kept.
    Success,
    /// Halted via REVERT; its changes are discarded.
    Revert,
    /// Aborted by an error; its changes are discarded.
    Fault(Error),
}

/// [`FrameResult`] is what a finished frame hands back to its caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameResult {
    /// How the frame ended.
    pub outcome: Outcome,

    /// RETURN or REVERT data. Empty for every other ending.
    pub output: Bytes,
}

impl FrameResult {
    /// A successful result with `output`.
    pub fn success(output: Bytes) -> Self {
        Self { outcome: Outcome::Success, output }
    }

    /// A faulted result.
    pub fn fault(error: Error) -> Self {
        Self { outcome: Outcome::Fault(error), output: Bytes::new() }
    }

    /// Returns `true` if the frame's changes should be kept.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

impl From<Halt> for FrameResult {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Stop | Halt::SelfDestruct => Self::success(Bytes::new()),
            Halt::Return(output) => Self::success(output),
            Halt::Revert(output) => Self { outcome: Outcome::Revert, output },
        }
    }
}

/// Everything needed to start an execution. Missing fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionParams {
    /// Code of the top-level frame.
    pub code: Bytes,

    /// Transaction context.
    pub tx: TxData,

    /// Block context.
    pub block: BlockData,

    /// Initial accounts.
    pub global_state: GlobalState,

    /// Initial persistent storage.
    pub storage: Storage,
}

impl ExecutionParams {
    /// Parameters running `code` with a default transaction and block.
    pub fn new(code: impl Into<Bytes>) -> Self {
        Self { code: code.into(), ..Default::default() }
    }

    /// Sets the transaction context.
    pub fn with_tx(mut self, tx: TxData) -> Self {
        self.tx = tx;
        self
    }

    /// Sets the block context.
    pub fn with_block(mut self, block: BlockData) -> Self {
        self.block = block;
        self
    }

    /// Sets the initial accounts.
    pub fn with_global_state(mut self, global_state: GlobalState) -> Self {
        self.global_state = global_state;
        self
    }

    /// Sets the initial storage.
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }
}

/// [`ExecutionResult`] is the result of a top-level execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Whether the top-level frame halted successfully.
    pub success: bool,

    /// Final stack of the top-level frame, bottom to top.
    pub stack: Vec<U256>,

    /// RETURN or REVERT data of the top-level frame.
    #[serde(rename = "return")]
    pub return_data: Bytes,

    /// Logs emitted by the call tree. Empty unless `success`.
    pub logs: Vec<Log>,

    /// Accounts after execution.
    pub global_state: BTreeMap<Address, Account>,

    /// Persistent storage after execution.
    pub storage: BTreeMap<Address, BTreeMap<B256, B256>>,

    /// Function selectors found in the code.
    pub selectors: Vec<String>,

    /// The fault that aborted the top-level frame, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,

    /// Instructions executed across the call tree.
    pub steps: u64,
}

impl ExecutionResult {
    /// Persistent storage slot `key` of `address` after execution.
    pub fn storage_at(&self, address: Address, key: U256) -> U256 {
        self.storage
            .get(&address)
            .and_then(|slots| slots.get(&B256::from(key.to_be_bytes::<32>())))
            .map(|value| U256::from_be_bytes(value.0))
            .unwrap_or_default()
    }
}

/// Read-only view of a frame after one instruction, as delivered to step observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSnapshot {
    /// Call depth of the frame, 0 for the top level.
    pub depth: usize,

    /// Position of the instruction that just ran.
    pub pc: usize,

    /// Opcode byte of that instruction.
    pub opcode: u8,

    /// Opcode name.
    pub name: &'static str,

    /// Gas reported by GAS. Constant, since gas is never consumed.
    pub gas_left: u64,

    /// Stack after the instruction, bottom to top.
    pub stack: Vec<U256>,

    /// Memory size after the instruction.
    pub memory_size: usize,

    /// Storage writes made by the instruction, including those of any sub-call it made.
    pub storage_changes: Vec<StorageChange>,
}
