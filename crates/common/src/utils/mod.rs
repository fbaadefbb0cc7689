/// Loading bytecode from hex strings or files.
pub mod bytecode;
/// Hexadecimal formatting utilities.
pub mod hex;

/// Input/output utilities for file manipulation.
pub mod io;

/// String manipulation and hex encoding utilities.
pub mod strings;
