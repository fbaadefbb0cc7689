use std::collections::VecDeque;

use alloy::primitives::U256;

use crate::{core::constants::MAX_STACK_SIZE, error::Error};

/// The [`Stack`] struct represents the machine's word stack.
/// It is a bounded LIFO data structure holding at most [`MAX_STACK_SIZE`] [`U256`] words.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Stack {
    /// The words on the stack.
    ///
    /// The front of the deque represents the top of the stack.
    stack: VecDeque<U256>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// Creates a new [`Stack`].
    ///
    /// ```
    /// use kiln_vm::core::stack::Stack;
    ///
    /// let stack = Stack::new();
    /// assert_eq!(stack.size(), 0);
    /// ```
    pub fn new() -> Stack {
        Stack { stack: VecDeque::with_capacity(MAX_STACK_SIZE) }
    }

    /// Push a word onto the stack.
    ///
    /// ```
    /// use kiln_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(U256::from(0x00)).expect("push failed");
    /// assert_eq!(stack.size(), 1);
    /// ```
    pub fn push(&mut self, value: U256) -> Result<(), Error> {
        if self.stack.len() >= MAX_STACK_SIZE {
            return Err(Error::StackOverflow(MAX_STACK_SIZE));
        }
        self.stack.push_front(value);
        Ok(())
    }

    /// Push a big-endian byte string as a word. Fails with [`Error::InvalidStackValue`] when the
    /// bytes do not fit in 256 bits.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let value =
            U256::try_from_be_slice(bytes).ok_or(Error::InvalidStackValue(bytes.len()))?;
        self.push(value)
    }

    /// Push `1` for `true` and `0` for `false`.
    pub fn push_bool(&mut self, condition: bool) -> Result<(), Error> {
        self.push(if condition { U256::from(1) } else { U256::ZERO })
    }

    /// Pop a word off the stack.
    ///
    /// ```
    /// use kiln_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(U256::from(0x00)).expect("push failed");
    ///
    /// assert_eq!(stack.pop(), Ok(U256::from(0x00)));
    /// assert!(stack.pop().is_err());
    /// ```
    pub fn pop(&mut self) -> Result<U256, Error> {
        self.stack.pop_front().ok_or(Error::StackUnderflow { needed: 1, found: 0 })
    }

    /// Pop n words off the stack, in pop order: index 0 is the most recently pushed word.
    ///
    /// ```
    /// use kiln_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(U256::from(0x00)).expect("push failed");
    /// stack.push(U256::from(0x01)).expect("push failed");
    /// stack.push(U256::from(0x02)).expect("push failed");
    ///
    /// // stack is now [0x02, 0x01, 0x00]
    /// let words = stack.pop_n(2).expect("pop failed");
    /// assert_eq!(words, vec![U256::from(0x02), U256::from(0x01)]);
    ///
    /// // stack is now [0x00]
    /// assert_eq!(stack.size(), 1);
    /// ```
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<U256>, Error> {
        self.require(n)?;
        Ok(self.stack.drain(0..n).collect())
    }

    /// Peek at the n-th word from the top, 1-indexed. `peek(1)` is the top of the stack.
    ///
    /// ```
    /// use kiln_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(U256::from(0x00)).expect("push failed");
    /// stack.push(U256::from(0x01)).expect("push failed");
    ///
    /// assert_eq!(stack.peek(1), Ok(U256::from(0x01)));
    /// assert_eq!(stack.peek(2), Ok(U256::from(0x00)));
    /// assert!(stack.peek(3).is_err());
    /// ```
    pub fn peek(&self, n: usize) -> Result<U256, Error> {
        if n == 0 {
            return Err(Error::StackUnderflow { needed: 1, found: self.stack.len() });
        }
        self.require(n)?;
        Ok(self.stack[n - 1])
    }

    /// Returns up to the top n words without removing them, top first.
    pub fn peek_n(&self, n: usize) -> Vec<U256> {
        self.stack.iter().take(n).copied().collect()
    }

    /// Swap the top word with the word n positions below it.
    ///
    /// ```
    /// use kiln_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(U256::from(0x00)).expect("push failed");
    /// stack.push(U256::from(0x01)).expect("push failed");
    /// stack.push(U256::from(0x02)).expect("push failed");
    ///
    /// // stack is now [0x02, 0x01, 0x00]
    /// stack.swap(2).expect("swap failed");
    ///
    /// // stack is now [0x00, 0x01, 0x02]
    /// assert_eq!(stack.peek(1), Ok(U256::from(0x00)));
    /// assert_eq!(stack.peek(3), Ok(U256::from(0x02)));
    /// ```
    pub fn swap(&mut self, n: usize) -> Result<(), Error> {
        self.require(n + 1)?;
        self.stack.swap(0, n);
        Ok(())
    }

    /// Duplicate the n-th word from the top (1-indexed) onto the top of the stack.
    ///
    /// ```
    /// use kiln_vm::core::stack::Stack;
    /// use alloy::primitives::U256;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(U256::from(0x00)).expect("push failed");
    /// stack.push(U256::from(0x01)).expect("push failed");
    ///
    /// // stack is now [0x01, 0x00]
    /// stack.dup(2).expect("dup failed");
    ///
    /// // stack is now [0x00, 0x01, 0x00]
    /// assert_eq!(stack.peek(1), Ok(U256::from(0x00)));
    /// assert_eq!(stack.size(), 3);
    /// ```
    pub fn dup(&mut self, n: usize) -> Result<(), Error> {
        let value = self.peek(n)?;
        self.push(value)
    }

    /// Number of words on the stack.
    pub fn size(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` when the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The stack contents ordered from bottom to top.
    pub fn to_vec(&self) -> Vec<U256> {
        self.stack.iter().rev().copied().collect()
    }

    fn require(&self, needed: usize) -> Result<(), Error> {
        if self.stack.len() < needed {
            return Err(Error::StackUnderflow { needed, found: self.stack.len() });
        }
        Ok(())
    }
}
