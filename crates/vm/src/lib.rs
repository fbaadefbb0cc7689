//! Kiln bytecode interpreter
//!
//! A deterministic, stack-based interpreter for EVM bytecode. It runs code against an in-memory
//! world state (balances, code, storage) with a transaction and block context, and reports the
//! final stack, return data, logs and state.
//!
//! ```
//! use kiln_vm::{ExecutionParams, Interpreter};
//! use alloy::primitives::{Address, U256};
//!
//! // PUSH1 0x01, PUSH1 0x00, SSTORE
//! let result = Interpreter::default().start(ExecutionParams::new(vec![0x60, 0x01, 0x60, 0x00, 0x55]));
//!
//! assert!(result.success);
//! assert_eq!(result.storage_at(Address::ZERO, U256::ZERO), U256::from(1));
//! ```

/// Core VM implementation, including memory, stack, storage, and opcodes
pub mod core;

/// Error types for the interpreter
pub mod error;

/// Extensions to the core VM, such as selector analysis
pub mod ext;

pub use crate::{
    core::{
        env::{BlockData, TxData},
        log::Log,
        state::{Account, GlobalState},
        storage::Storage,
        vm::{
            ExecutionParams, ExecutionResult, Interpreter, InterpreterConfig, NoopObserver,
            StepObserver, StepSnapshot, TraceCollector,
        },
    },
    error::Error,
};
