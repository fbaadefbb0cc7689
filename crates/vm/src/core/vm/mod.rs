//! The interpreter engine.
//!
//! [`Interpreter`] runs [`Frame`]s: it fetches the opcode at the program counter, looks its
//! handler up in the dispatch [`table`], and applies the returned [`Control`]. Call-family
//! handlers re-enter the interpreter with a child frame borrowing the same world state.

mod core;
mod execution;
mod frame;
mod observer;

/// Opcode handlers organized by category.
pub mod handlers;

/// The opcode dispatch table.
pub mod table;

pub use self::core::{Interpreter, InterpreterConfig};
pub use execution::{
    Control, ExecutionParams, ExecutionResult, FrameResult, Halt, Outcome, StepSnapshot,
};
pub use frame::{CallContext, Frame};
pub use observer::{NoopObserver, StepObserver, TraceCollector};
