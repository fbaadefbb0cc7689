use alloy::primitives::U256;

use crate::{
    core::{
        constants::DEFAULT_MEMORY_LIMIT,
        word::{as_usize, ceil32},
    },
    error::Error,
};

/// The [`Memory`] struct represents the byte-addressed scratch memory of a frame.
///
/// Stores grow the buffer to the next 32-byte boundary covering the written range. Loads never
/// grow it: bytes past the end read as zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    /// Vector storing memory data
    memory: Vec<u8>,

    /// Largest size, in bytes, the buffer may grow to
    limit: usize,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a new, empty [`Memory`] bounded by [`DEFAULT_MEMORY_LIMIT`]
    pub fn new() -> Memory {
        Self::with_limit(DEFAULT_MEMORY_LIMIT)
    }

    /// Creates a new, empty [`Memory`] that may grow to at most `limit` bytes
    pub fn with_limit(limit: usize) -> Memory {
        Memory { memory: Vec::with_capacity(limit.min(2048)), limit }
    }

    /// Gets the current size of the memory in bytes.
    ///
    /// ```
    /// use kiln_vm::core::memory::Memory;
    ///
    /// let memory = Memory::new();
    /// assert_eq!(memory.size(), 0);
    /// ```
    pub fn size(&self) -> usize {
        self.memory.len()
    }

    /// Returns `true` if nothing has been written to memory yet.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// The raw memory contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }

    /// Stores `size` bytes of `value` at `offset`, growing memory to cover the write.
    ///
    /// Fails with [`Error::InvalidMemoryValueSize`] when `value.len() != size`, and with
    /// [`Error::InvalidMemoryOffset`] when the write would reach past the memory limit. A
    /// zero-sized store is a no-op.
    ///
    /// ```
    /// use kiln_vm::core::memory::Memory;
    ///
    /// let mut memory = Memory::new();
    /// memory.store(0, &[0xff], 1).expect("store failed");
    /// assert_eq!(memory.size(), 32);
    /// assert_eq!(memory.load(0, 2).expect("load failed"), vec![0xff, 0x00]);
    /// ```
    pub fn store(&mut self, offset: usize, value: &[u8], size: usize) -> Result<(), Error> {
        if value.len() != size {
            return Err(Error::InvalidMemoryValueSize { expected: size, actual: value.len() });
        }
        if size == 0 {
            return Ok(());
        }

        let end = self.end_of(offset, size)?;
        if end > self.memory.len() {
            self.memory.resize(ceil32(end).min(self.limit), 0);
        }
        self.memory[offset..end].copy_from_slice(value);
        Ok(())
    }

    /// Checks that `size` bytes at `offset` fit under the memory limit, without touching
    /// memory. Callers building a buffer for [`Memory::store`] check first, so an out-of-range
    /// size never reaches the allocator.
    ///
    /// ```
    /// use kiln_vm::core::memory::Memory;
    ///
    /// let memory = Memory::with_limit(64);
    /// assert!(memory.ensure_writable(32, 32).is_ok());
    /// assert!(memory.ensure_writable(33, 32).is_err());
    /// assert!(memory.ensure_writable(usize::MAX, 0).is_ok());
    /// ```
    pub fn ensure_writable(&self, offset: usize, size: usize) -> Result<(), Error> {
        if size == 0 {
            return Ok(());
        }
        self.end_of(offset, size).map(|_| ())
    }

    /// Stores a word at `offset`, big-endian.
    pub fn store_word(&mut self, offset: usize, value: U256) -> Result<(), Error> {
        self.store(offset, &value.to_be_bytes::<32>(), 32)
    }

    /// Loads `size` bytes from `offset`. Bytes beyond the current size read as zero, and the
    /// memory size is left unchanged.
    ///
    /// ```
    /// use kiln_vm::core::memory::Memory;
    ///
    /// let memory = Memory::new();
    /// assert_eq!(memory.load(64, 4).expect("load failed"), vec![0; 4]);
    /// assert_eq!(memory.size(), 0);
    /// ```
    pub fn load(&self, offset: usize, size: usize) -> Result<Vec<u8>, Error> {
        if size == 0 {
            return Ok(Vec::new());
        }
        if size > self.limit {
            return Err(Error::InvalidMemoryOffset(U256::from(size)));
        }

        Ok(slice_padded(&self.memory, offset, size))
    }

    /// Loads the word at `offset`.
    pub fn load_word(&self, offset: usize) -> Result<U256, Error> {
        Ok(U256::from_be_slice(&self.load(offset, 32)?))
    }

    /// Copies `size` bytes from `source` to `destination`. Overlapping ranges behave as if the
    /// source was first copied to an intermediate buffer.
    pub fn copy_within(
        &mut self,
        destination: usize,
        source: usize,
        size: usize,
    ) -> Result<(), Error> {
        let value = self.load(source, size)?;
        self.store(destination, &value, size)
    }

    fn end_of(&self, offset: usize, size: usize) -> Result<usize, Error> {
        offset
            .checked_add(size)
            .filter(|end| *end <= self.limit)
            .ok_or_else(|| {
                Error::InvalidMemoryOffset(U256::from(offset).saturating_add(U256::from(size)))
            })
    }
}

/// Resolves a stack-supplied `(offset, size)` pair into native sizes.
///
/// A zero size never touches memory, so its offset is not validated and `(0, 0)` is returned.
pub fn region(offset: U256, size: U256) -> Result<(usize, usize), Error> {
    let size = as_usize(size).ok_or(Error::InvalidMemoryOffset(size))?;
    if size == 0 {
        return Ok((0, 0));
    }
    let offset = as_usize(offset).ok_or(Error::InvalidMemoryOffset(offset))?;
    Ok((offset, size))
}

/// Copies `size` bytes of `source` starting at `offset`, zero-padding whatever lies past its end.
///
/// ```
/// use kiln_vm::core::memory::slice_padded;
///
/// assert_eq!(slice_padded(&[1, 2, 3], 1, 4), vec![2, 3, 0, 0]);
/// assert_eq!(slice_padded(&[1, 2, 3], usize::MAX, 2), vec![0, 0]);
/// ```
pub fn slice_padded(source: &[u8], offset: usize, size: usize) -> Vec<u8> {
    let mut value = vec![0u8; size];
    if offset < source.len() {
        let end = offset.saturating_add(size).min(source.len());
        value[..end - offset].copy_from_slice(&source[offset..end]);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_fills_gap_with_zeros() {
        let mut memory = Memory::new();
        memory.store(0, &[1, 2, 3], 3).expect("store failed");
        memory.store(4, &[4, 5, 6], 3).expect("store failed");
        assert_eq!(memory.load(0, 7).expect("load failed"), vec![1, 2, 3, 0, 4, 5, 6]);
        assert_eq!(memory.size(), 32);
    }

    #[test]
    fn test_store_grows_to_word_boundary() {
        let mut memory = Memory::new();
        memory.store(31, &[1, 2], 2).expect("store failed");
        assert_eq!(memory.size(), 64);
        memory.store(0, &[9], 1).expect("store failed");
        assert_eq!(memory.size(), 64);
    }

    #[test]
    fn test_ensure_writable_rejects_huge_sizes() {
        let memory = Memory::new();
        assert_eq!(
            memory.ensure_writable(0, usize::MAX),
            Err(Error::InvalidMemoryOffset(U256::from(usize::MAX)))
        );
        assert!(memory.ensure_writable(usize::MAX, 1).is_err());
        assert!(memory.ensure_writable(0, DEFAULT_MEMORY_LIMIT).is_ok());
        assert!(memory.ensure_writable(1, DEFAULT_MEMORY_LIMIT).is_err());
    }

    #[test]
    fn test_zero_sized_store_does_not_grow() {
        let mut memory = Memory::new();
        memory.store(1024, &[], 0).expect("store failed");
        assert_eq!(memory.size(), 0);
    }

    #[test]
    fn test_store_size_mismatch() {
        let mut memory = Memory::new();
        assert_eq!(
            memory.store(0, &[1, 2], 3),
            Err(Error::InvalidMemoryValueSize { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_load_beyond_size_does_not_grow() {
        let mut memory = Memory::new();
        memory.store(0, &[0xaa; 4], 4).expect("store failed");
        assert_eq!(memory.load(30, 4).expect("load failed"), vec![0, 0, 0, 0]);
        assert_eq!(memory.load(100, 8).expect("load failed"), vec![0; 8]);
        assert_eq!(memory.size(), 32);
        assert!(memory.load(5, 0).expect("load failed").is_empty());
    }

    #[test]
    fn test_limit() {
        let mut memory = Memory::with_limit(64);
        assert!(memory.store(60, &[1; 8], 8).is_err());
        memory.store(56, &[1; 8], 8).expect("store failed");
        assert_eq!(memory.size(), 64);
        assert!(memory.load(0, 65).is_err());
    }

    #[test]
    fn test_word_roundtrip() {
        let mut memory = Memory::new();
        memory.store_word(0, U256::from(0x1234)).expect("store failed");
        assert_eq!(memory.load_word(0), Ok(U256::from(0x1234)));
        assert_eq!(memory.load(30, 2).expect("load failed"), vec![0x12, 0x34]);
    }

    #[test]
    fn test_copy_within_overlapping() {
        let mut memory = Memory::new();
        memory.store(0, &[1, 2, 3, 4], 4).expect("store failed");
        memory.copy_within(1, 0, 4).expect("copy failed");
        assert_eq!(memory.load(0, 5).expect("load failed"), vec![1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_region() {
        assert_eq!(region(U256::MAX, U256::ZERO), Ok((0, 0)));
        assert_eq!(region(U256::from(4), U256::from(8)), Ok((4, 8)));
        assert!(region(U256::MAX, U256::from(1)).is_err());
    }
}
