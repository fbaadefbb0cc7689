//! Heuristic function-selector extraction.
//!
//! Solidity and Vyper dispatchers compare the first four bytes of calldata against each
//! function's selector, which shows up in bytecode as a `PUSH4 <selector>` shortly followed by
//! a comparison (`EQ`, or `XOR` / `SUB` on some compilers) or by the `JUMPI` that branches to
//! the function body. This is best effort and plays no part in execution.

use hashbrown::HashSet;
use kiln_common::utils::strings::encode_hex;
use tracing::trace;

use crate::core::opcodes::{immediate_size, EQ, JUMPI, PUSH4, SUB, XOR};

/// How many instructions after a `PUSH4` are searched for the comparison.
const SELECTOR_WINDOW: usize = 3;

/// A decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// Offset of the opcode in the code.
    pub pc: usize,

    /// The opcode byte.
    pub opcode: u8,

    /// Immediate bytes. Shorter than the opcode demands if the code ends early.
    pub immediate: &'a [u8],
}

/// Splits `code` into instructions, keeping PUSH immediates attached to their opcode.
///
/// ```
/// use kiln_vm::ext::selectors::disassemble;
///
/// // PUSH2 0x0102, ADD
/// let instructions = disassemble(&[0x61, 0x01, 0x02, 0x01]);
/// assert_eq!(instructions.len(), 2);
/// assert_eq!(instructions[0].immediate, &[0x01, 0x02]);
/// assert_eq!(instructions[1].pc, 3);
/// ```
pub fn disassemble(code: &[u8]) -> Vec<Instruction<'_>> {
    let mut instructions = Vec::new();
    let mut pc = 0;

    while pc < code.len() {
        let opcode = code[pc];
        let start = pc + 1;
        let end = (start + immediate_size(opcode)).min(code.len());
        instructions.push(Instruction { pc, opcode, immediate: &code[start..end] });
        pc = end;
    }

    instructions
}

/// Returns the distinct function selectors found in `code`, formatted as `0x%08x`, in order of
/// first appearance.
///
/// ```
/// use kiln_vm::ext::selectors::find_selectors;
///
/// // DUP1, PUSH4 0xa9059cbb, EQ, PUSH2 0x0020, JUMPI
/// let code = [0x80, 0x63, 0xa9, 0x05, 0x9c, 0xbb, 0x14, 0x61, 0x00, 0x20, 0x57];
/// assert_eq!(find_selectors(&code), vec!["0xa9059cbb".to_string()]);
/// ```
pub fn find_selectors(code: &[u8]) -> Vec<String> {
    let instructions = disassemble(code);
    let mut handled_selectors = HashSet::new();
    let mut selectors = Vec::new();

    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != PUSH4 || instruction.immediate.len() != 4 {
            continue;
        }

        let compared = instructions[i + 1..]
            .iter()
            .take(SELECTOR_WINDOW)
            .take_while(|next| next.opcode != PUSH4)
            .any(|next| matches!(next.opcode, EQ | XOR | SUB | JUMPI));
        if !compared {
            continue;
        }

        let selector = format!("0x{}", encode_hex(instruction.immediate));
        if handled_selectors.insert(selector.clone()) {
            trace!(pc = instruction.pc, "found selector: {}", selector);
            selectors.push(selector);
        }
    }

    selectors
}

#[cfg(test)]
mod tests {
    use kiln_common::utils::strings::decode_hex;

    use super::*;

    #[test]
    fn test_solidity_dispatcher() {
        let code = decode_hex(concat!(
            "60003560e01c",             // PUSH1 0 CALLDATALOAD PUSH1 0xe0 SHR
            "8063a9059cbb1461002057", // DUP1 PUSH4 transfer(address,uint256) EQ PUSH2 JUMPI
            "806370a082311461003057", // DUP1 PUSH4 balanceOf(address) EQ PUSH2 JUMPI
            "8063a9059cbb1461002057", // duplicate
            "00"
        ))
        .expect("failed to decode hex");

        assert_eq!(find_selectors(&code), vec!["0xa9059cbb", "0x70a08231"]);
    }

    #[test]
    fn test_xor_pattern() {
        // PUSH4 0x18160ddd, DUP2, XOR, PUSH2, JUMPI
        let code = decode_hex("6318160ddd811861001057").expect("failed to decode hex");
        assert_eq!(find_selectors(&code), vec!["0x18160ddd"]);
    }

    #[test]
    fn test_ignores_unrelated_push4() {
        // PUSH4 0xdeadbeef, POP, STOP
        let code = decode_hex("63deadbeef5000").expect("failed to decode hex");
        assert!(find_selectors(&code).is_empty());
    }

    #[test]
    fn test_ignores_push4_inside_immediates() {
        // PUSH6 0x63aabbccdd14, STOP
        let code = decode_hex("6563aabbccdd1400").expect("failed to decode hex");
        assert!(find_selectors(&code).is_empty());
    }

    #[test]
    fn test_truncated_push4() {
        let code = decode_hex("63aabb").expect("failed to decode hex");
        assert!(find_selectors(&code).is_empty());
        assert_eq!(disassemble(&code)[0].immediate, &[0xaa, 0xbb]);
    }
}
