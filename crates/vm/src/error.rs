//! Error types for the interpreter

use alloy::primitives::U256;
use serde::{Serialize, Serializer};

/// Faults that abort the currently executing frame.
///
/// Normal termination (`STOP`, `RETURN`) and explicit aborts (`REVERT`) are not errors; they are
/// reported through [`crate::core::vm::Control`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A push would grow the stack past its maximum depth
    #[error("stack overflow: depth would exceed {0}")]
    StackOverflow(usize),

    /// An operation needed more items than the stack holds
    #[error("stack underflow: needed {needed} item(s), found {found}")]
    StackUnderflow {
        /// Number of items the operation requires
        needed: usize,
        /// Number of items present
        found: usize,
    },

    /// A value wider than 256 bits was pushed
    #[error("invalid stack value: {0} bytes does not fit in a 256-bit word")]
    InvalidStackValue(usize),

    /// A memory offset or size is not addressable
    #[error("invalid memory offset: {0}")]
    InvalidMemoryOffset(U256),

    /// The value handed to a memory store does not match the requested size
    #[error("invalid memory value size: expected {expected} bytes, got {actual}")]
    InvalidMemoryValueSize {
        /// Declared size of the write
        expected: usize,
        /// Length of the provided value
        actual: usize,
    },

    /// A storage value wider than 32 bytes was written
    #[error("invalid storage value size: {0} bytes")]
    InvalidStorageValueSize(usize),

    /// A PUSH immediate runs past the end of the code
    #[error("program counter out of bounds: {0}")]
    ProgramCounterOutOfBounds(usize),

    /// A jump landed on a byte that is not JUMPDEST
    #[error("invalid jump destination: {0}")]
    InvalidJumpDestination(usize),

    /// A jump target lies outside of the code
    #[error("jump out of bounds: {0}")]
    JumpOutOfBounds(U256),

    /// The opcode byte has no handler
    #[error("opcode not implemented: 0x{0:02x}")]
    OpcodeNotImplemented(u8),

    /// The designated INVALID opcode (0xfe) was executed
    #[error("invalid opcode")]
    InvalidOpcode,

    /// A state mutation was attempted inside a static frame
    #[error("state change in static context: {0}")]
    StaticStateChange(&'static str),

    /// A frame was entered above the configured call depth
    #[error("call depth exceeded: {0}")]
    CallDepthExceeded(usize),

    /// The call depth was decremented below zero
    #[error("call depth underflow")]
    CallDepthUnderflow,

    /// The execution ran more instructions than allowed
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
