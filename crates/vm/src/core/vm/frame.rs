use alloy::primitives::{Address, Bytes, U256};

use crate::{
    core::{
        env::{BlockData, TxData},
        journal::Checkpoint,
        memory::{region, slice_padded, Memory},
        stack::Stack,
        word::{as_usize_saturated, to_address},
        world::World,
    },
    error::Error,
};

use super::execution::StepSnapshot;

/// Message a frame runs with: who runs it, on whose behalf, with what value and input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Address whose storage and balance the frame acts on.
    pub address: Address,

    /// Account that made the call.
    pub caller: Address,

    /// Transaction signer.
    pub origin: Address,

    /// Wei sent with the call.
    pub value: U256,

    /// Input data.
    pub data: Bytes,

    /// Gas price of the transaction.
    pub gas_price: U256,

    /// Gas reported by GAS.
    pub gas: u64,
}

impl From<&TxData> for CallContext {
    fn from(tx: &TxData) -> Self {
        Self {
            address: tx.to,
            caller: tx.from,
            origin: tx.origin,
            value: tx.value,
            data: tx.data.clone(),
            gas_price: tx.gas_price,
            gas: tx.gas_limit,
        }
    }
}

/// The [`Frame`] struct is one invocation of the interpreter loop.
///
/// Stack, memory, program counter and return-data buffer belong to the frame and are dropped with
/// it. The [`World`] is borrowed from the caller, so every frame of a call tree works on the same
/// accounts, storage and logs.
#[derive(Debug)]
pub struct Frame<'a> {
    /// State shared by the whole call tree.
    pub world: &'a mut World,

    /// Block context.
    pub block: &'a BlockData,

    /// Message being executed.
    pub context: CallContext,

    /// Code being executed.
    pub code: Bytes,

    /// Position of the next instruction.
    pub pc: usize,

    /// Word stack.
    pub stack: Stack,

    /// Scratch memory.
    pub memory: Memory,

    /// Whether state changes are forbidden.
    pub is_static: bool,

    /// Output of the most recent sub-call.
    pub return_data: Bytes,

    /// Number of frames above this one.
    pub depth: usize,
}

impl<'a> Frame<'a> {
    /// Creates a frame at `pc = 0` with an empty stack and memory.
    pub fn new(
        world: &'a mut World,
        block: &'a BlockData,
        context: CallContext,
        code: Bytes,
        is_static: bool,
        depth: usize,
        memory_limit: usize,
    ) -> Self {
        Self {
            world,
            block,
            context,
            code,
            pc: 0,
            stack: Stack::new(),
            memory: Memory::with_limit(memory_limit),
            is_static,
            return_data: Bytes::new(),
            depth,
        }
    }

    /// The opcode at the program counter.
    pub fn opcode(&self) -> Result<u8, Error> {
        self.code.get(self.pc).copied().ok_or(Error::ProgramCounterOutOfBounds(self.pc))
    }

    /// Pops a word and reads it as an address.
    pub fn pop_address(&mut self) -> Result<Address, Error> {
        Ok(to_address(self.stack.pop()?))
    }

    /// Pops `offset` and `size`, returning that memory range.
    pub fn pop_memory_range(&mut self) -> Result<Vec<u8>, Error> {
        let offset = self.stack.pop()?;
        let size = self.stack.pop()?;
        let (offset, size) = region(offset, size)?;
        self.memory.load(offset, size)
    }

    /// Pops `destOffset`, `offset` and `size`, then copies that range of `source` into memory,
    /// zero-padding past its end. Used by the *COPY opcodes.
    pub fn copy_to_memory(&mut self, source: &[u8]) -> Result<(), Error> {
        let destination = self.stack.pop()?;
        let offset = self.stack.pop()?;
        let size = self.stack.pop()?;

        let (destination, size) = region(destination, size)?;
        self.memory.ensure_writable(destination, size)?;
        let value = slice_padded(source, as_usize_saturated(offset), size);
        self.memory.store(destination, &value, size)
    }

    /// Snapshot of the frame after the instruction at `pc` ran.
    pub(crate) fn snapshot(
        &self,
        pc: usize,
        opcode: u8,
        name: &'static str,
        checkpoint: Checkpoint,
    ) -> StepSnapshot {
        StepSnapshot {
            depth: self.depth,
            pc,
            opcode,
            name,
            gas_left: self.context.gas,
            stack: self.stack.to_vec(),
            memory_size: self.memory.size(),
            storage_changes: self.world.storage_changes_since(checkpoint),
        }
    }
}
