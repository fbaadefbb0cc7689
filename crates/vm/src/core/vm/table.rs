//! The 256-entry dispatch table.
//!
//! Every opcode byte maps to at most one [`Handler`]. Unassigned bytes are `None` and fault
//! with [`Error::OpcodeNotImplemented`] when executed.

use lazy_static::lazy_static;

use crate::{core::opcodes::*, error::Error};

use super::{
    core::Interpreter, execution::Control, frame::Frame, handlers::*, observer::StepObserver,
};

/// A handler that only touches its own frame.
pub type SimpleHandler = fn(&mut Frame<'_>) -> Result<Control, Error>;

/// A handler that re-enters the interpreter to run a nested frame.
pub type SystemHandler =
    fn(&mut Frame<'_>, &Interpreter, &mut dyn StepObserver) -> Result<Control, Error>;

/// An entry of the dispatch table.
#[derive(Clone, Copy, Debug)]
pub enum Handler {
    /// Opcodes that never leave the current frame.
    Simple(SimpleHandler),
    /// CALL, CALLCODE, DELEGATECALL, STATICCALL, CREATE and CREATE2.
    System(SystemHandler),
}

impl Handler {
    /// Runs the handler against `frame`.
    #[inline]
    pub fn execute(
        self,
        frame: &mut Frame<'_>,
        interpreter: &Interpreter,
        observer: &mut dyn StepObserver,
    ) -> Result<Control, Error> {
        match self {
            Self::Simple(handler) => handler(frame),
            Self::System(handler) => handler(frame, interpreter, observer),
        }
    }
}

lazy_static! {
    /// Maps each opcode byte to its handler.
    pub static ref INSTRUCTION_TABLE: [Option<Handler>; 256] = build_table();
}

/// The handler for `opcode`, if it has one.
#[inline]
pub fn handler(opcode: u8) -> Option<Handler> {
    INSTRUCTION_TABLE[opcode as usize]
}

fn build_table() -> [Option<Handler>; 256] {
    use Handler::{Simple, System};

    let mut table: [Option<Handler>; 256] = [None; 256];
    let mut set = |opcode: u8, handler: Handler| table[opcode as usize] = Some(handler);

    set(STOP, Simple(control::stop));

    set(ADD, Simple(arithmetic::add));
    set(MUL, Simple(arithmetic::mul));
    set(SUB, Simple(arithmetic::sub));
    set(DIV, Simple(arithmetic::div));
    set(SDIV, Simple(arithmetic::sdiv));
    set(MOD, Simple(arithmetic::modulo));
    set(SMOD, Simple(arithmetic::smod));
    set(ADDMOD, Simple(arithmetic::addmod));
    set(MULMOD, Simple(arithmetic::mulmod));
    set(EXP, Simple(arithmetic::exp));
    set(SIGNEXTEND, Simple(arithmetic::signextend));

    set(LT, Simple(comparison::lt));
    set(GT, Simple(comparison::gt));
    set(SLT, Simple(comparison::slt));
    set(SGT, Simple(comparison::sgt));
    set(EQ, Simple(comparison::eq));
    set(ISZERO, Simple(comparison::iszero));
    set(AND, Simple(bitwise::and));
    set(OR, Simple(bitwise::or));
    set(XOR, Simple(bitwise::xor));
    set(NOT, Simple(bitwise::not));
    set(BYTE, Simple(bitwise::byte));
    set(SHL, Simple(bitwise::shl));
    set(SHR, Simple(bitwise::shr));
    set(SAR, Simple(bitwise::sar));

    set(SHA3, Simple(crypto::sha3));

    set(ADDRESS, Simple(environment::address));
    set(BALANCE, Simple(environment::balance));
    set(ORIGIN, Simple(environment::origin));
    set(CALLER, Simple(environment::caller));
    set(CALLVALUE, Simple(environment::callvalue));
    set(CALLDATALOAD, Simple(environment::calldataload));
    set(CALLDATASIZE, Simple(environment::calldatasize));
    set(CALLDATACOPY, Simple(environment::calldatacopy));
    set(CODESIZE, Simple(environment::codesize));
    set(CODECOPY, Simple(environment::codecopy));
    set(GASPRICE, Simple(environment::gasprice));
    set(EXTCODESIZE, Simple(environment::extcodesize));
    set(EXTCODECOPY, Simple(environment::extcodecopy));
    set(RETURNDATASIZE, Simple(environment::returndatasize));
    set(RETURNDATACOPY, Simple(environment::returndatacopy));
    set(EXTCODEHASH, Simple(environment::extcodehash));
    set(SELFBALANCE, Simple(environment::selfbalance));

    set(BLOCKHASH, Simple(block::blockhash));
    set(COINBASE, Simple(block::coinbase));
    set(TIMESTAMP, Simple(block::timestamp));
    set(NUMBER, Simple(block::number));
    set(DIFFICULTY, Simple(block::difficulty));
    set(GASLIMIT, Simple(block::gaslimit));
    set(CHAINID, Simple(block::chainid));
    set(BASEFEE, Simple(block::basefee));
    set(BLOBHASH, Simple(block::blobhash));
    set(BLOBBASEFEE, Simple(block::blobbasefee));

    set(POP, Simple(stack::pop));
    set(MLOAD, Simple(memory::mload));
    set(MSTORE, Simple(memory::mstore));
    set(MSTORE8, Simple(memory::mstore8));
    set(SLOAD, Simple(storage::sload));
    set(SSTORE, Simple(storage::sstore));
    set(JUMP, Simple(control::jump));
    set(JUMPI, Simple(control::jumpi));
    set(PC, Simple(control::pc));
    set(MSIZE, Simple(memory::msize));
    set(GAS, Simple(control::gas));
    set(JUMPDEST, Simple(control::jumpdest));
    set(TLOAD, Simple(storage::tload));
    set(TSTORE, Simple(storage::tstore));
    set(MCOPY, Simple(memory::mcopy));

    set(PUSH0, Simple(stack::push0));
    for opcode in PUSH1..=PUSH32 {
        set(opcode, Simple(stack::push_n));
    }
    for opcode in DUP1..=DUP16 {
        set(opcode, Simple(stack::dup_n));
    }
    for opcode in SWAP1..=SWAP16 {
        set(opcode, Simple(stack::swap_n));
    }
    for opcode in LOG0..=LOG4 {
        set(opcode, Simple(logging::log_n));
    }

    set(CREATE, System(system::create));
    set(CALL, System(system::call));
    set(CALLCODE, System(system::callcode));
    set(RETURN, Simple(system::op_return));
    set(DELEGATECALL, System(system::delegatecall));
    set(CREATE2, System(system::create2));
    set(STATICCALL, System(system::staticcall));
    set(REVERT, Simple(system::revert));
    set(INVALID, Simple(system::invalid));
    set(SELFDESTRUCT, Simple(system::selfdestruct));

    table
}
