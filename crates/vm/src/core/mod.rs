/// Constants used throughout the interpreter
pub mod constants;

/// Transaction and block context
pub mod env;

/// Undo log for world-state mutations
pub mod journal;

/// Log implementation for event handling
pub mod log;

/// Memory implementation for frame memory management
pub mod memory;

/// Opcode definitions and metadata
pub mod opcodes;

/// Stack implementation for the interpreter
pub mod stack;

/// Accounts and block hashes
pub mod state;

/// Storage implementation for contract storage
pub mod storage;

/// Core interpreter implementation
pub mod vm;

/// 256-bit word arithmetic helpers
pub mod word;

/// Transaction-global state shared by a call tree
pub mod world;
