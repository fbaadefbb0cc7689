//! 256-bit word helpers.
//!
//! Stack values are unsigned [`U256`] words; every operation here wraps modulo 2^256. Signed
//! opcodes reinterpret a word as a two's-complement integer through these helpers, so the
//! arithmetic itself only ever touches unsigned limbs.

use alloy::primitives::{Address, B256, I256, U256};

/// Returns `true` when the two's-complement reading of `value` is negative.
#[inline]
pub fn is_negative(value: U256) -> bool {
    value.bit(255)
}

/// Two's-complement negation, modulo 2^256.
#[inline]
pub fn negate(value: U256) -> U256 {
    U256::ZERO.wrapping_sub(value)
}

/// Magnitude of the two's-complement reading of `value`.
///
/// `abs(-2^255)` is `2^255`, which is representable as an unsigned word.
#[inline]
pub fn abs(value: U256) -> U256 {
    if is_negative(value) {
        negate(value)
    } else {
        value
    }
}

/// Reinterprets an unsigned word as a signed integer.
///
/// ```
/// use kiln_vm::core::word::to_signed;
/// use alloy::primitives::{I256, U256};
///
/// assert_eq!(to_signed(U256::MAX), I256::MINUS_ONE);
/// ```
#[inline]
pub fn to_signed(value: U256) -> I256 {
    I256::from_raw(value)
}

/// Reinterprets a signed integer as an unsigned word.
#[inline]
pub fn to_unsigned(value: I256) -> U256 {
    value.into_raw()
}

/// Signed division. Division by zero yields zero and `-2^255 / -1` wraps to `-2^255`.
///
/// ```
/// use kiln_vm::core::word::{negate, sdiv};
/// use alloy::primitives::U256;
///
/// let minus_ten = negate(U256::from(10));
/// assert_eq!(sdiv(minus_ten, U256::from(3)), negate(U256::from(3)));
/// assert_eq!(sdiv(minus_ten, U256::ZERO), U256::ZERO);
/// ```
pub fn sdiv(numerator: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::ZERO;
    }

    let quotient = abs(numerator) / abs(denominator);
    if is_negative(numerator) != is_negative(denominator) {
        negate(quotient)
    } else {
        quotient
    }
}

/// Signed remainder. The result takes the sign of the numerator; modulo zero yields zero.
pub fn smod(numerator: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::ZERO;
    }

    let remainder = abs(numerator) % abs(denominator);
    if is_negative(numerator) {
        negate(remainder)
    } else {
        remainder
    }
}

/// Signed less-than.
#[inline]
pub fn slt(a: U256, b: U256) -> bool {
    to_signed(a) < to_signed(b)
}

/// Arithmetic shift right, filling with the sign bit.
pub fn sar(shift: U256, value: U256) -> U256 {
    let negative = is_negative(value);
    if shift >= U256::from(256) {
        return if negative { U256::MAX } else { U256::ZERO };
    }

    let shift = shift.as_limbs()[0] as usize;
    if negative {
        !((!value) >> shift)
    } else {
        value >> shift
    }
}

/// Extends the sign of the `byte_index`-th least significant byte across the word.
pub fn signextend(byte_index: U256, value: U256) -> U256 {
    if byte_index >= U256::from(31) {
        return value;
    }

    let sign_bit = byte_index.as_limbs()[0] as usize * 8 + 7;
    let mask = (U256::from(1) << sign_bit) - U256::from(1);
    if value.bit(sign_bit) {
        value | !mask
    } else {
        value & mask
    }
}

/// Modular exponentiation.
///
/// Powers of two are resolved with a single shift, which covers the 2^96 / 2^160 / 2^224
/// masks compilers emit everywhere. Other bases use square-and-multiply.
///
/// ```
/// use kiln_vm::core::word::exp;
/// use alloy::primitives::U256;
///
/// assert_eq!(exp(U256::from(2), U256::from(160)), U256::from(1) << 160);
/// assert_eq!(exp(U256::from(3), U256::from(4)), U256::from(81));
/// assert_eq!(exp(U256::from(2), U256::from(256)), U256::ZERO);
/// ```
pub fn exp(base: U256, exponent: U256) -> U256 {
    if base == U256::from(2) {
        return if exponent < U256::from(256) {
            U256::from(1) << (exponent.as_limbs()[0] as usize)
        } else {
            U256::ZERO
        };
    }

    let mut result = U256::from(1);
    let mut square = base;
    for bit in 0..exponent.bit_len() {
        if exponent.bit(bit) {
            result = result.wrapping_mul(square);
        }
        square = square.wrapping_mul(square);
    }
    result
}

/// The `index`-th byte of `value`, counting from the most significant byte.
pub fn byte(index: U256, value: U256) -> U256 {
    if index >= U256::from(32) {
        return U256::ZERO;
    }

    let index = index.as_limbs()[0] as usize;
    U256::from(value.to_be_bytes::<32>()[index])
}

/// Rounds `size` up to the next multiple of 32, saturating at the largest aligned `usize`.
#[inline]
pub fn ceil32(size: usize) -> usize {
    size.div_ceil(32).saturating_mul(32)
}

/// Converts a word to a `usize`, returning `None` when it does not fit.
#[inline]
pub fn as_usize(value: U256) -> Option<usize> {
    if value > U256::from(usize::MAX) {
        None
    } else {
        Some(value.as_limbs()[0] as usize)
    }
}

/// Converts a word to a `usize`, clamping to `usize::MAX`.
#[inline]
pub fn as_usize_saturated(value: U256) -> usize {
    as_usize(value).unwrap_or(usize::MAX)
}

/// Interprets the low 20 bytes of a word as an address.
#[inline]
pub fn to_address(value: U256) -> Address {
    Address::from_word(value.to_be_bytes::<32>().into())
}

/// Left-pads an address into a word.
#[inline]
pub fn from_address(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

/// Big-endian bytes of a word.
#[inline]
pub fn to_b256(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

/// Word value of 32 big-endian bytes.
#[inline]
pub fn from_b256(value: B256) -> U256 {
    U256::from_be_bytes(value.0)
}
