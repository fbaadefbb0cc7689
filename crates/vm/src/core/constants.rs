/// Maximum number of words the stack can hold.
pub const MAX_STACK_SIZE: usize = 1024;

/// Default maximum nesting of CALL / CREATE frames.
pub const MAX_CALL_DEPTH: usize = 1024;

/// Native stack reserved per nested frame on the execution thread, in bytes.
pub const FRAME_STACK_SIZE: usize = 64 * 1024;

/// Native stack reserved on the execution thread on top of the per-frame share, in bytes.
pub const BASE_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Number of recent blocks whose hashes are visible to BLOCKHASH.
pub const BLOCKHASH_WINDOW: u64 = 256;

/// Default upper bound on a frame's memory, in bytes.
pub const DEFAULT_MEMORY_LIMIT: usize = 32 * 1024 * 1024;

/// Default gas allowance reported by the GAS opcode. Gas is never consumed.
pub const DEFAULT_GAS_LIMIT: u64 = u64::MAX;

/// Default chain id of the block context.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Default blob base fee of the block context.
pub const DEFAULT_BLOB_BASE_FEE: u64 = 1;

/// Default block gas limit.
pub const DEFAULT_BLOCK_GAS_LIMIT: u64 = 30_000_000;

