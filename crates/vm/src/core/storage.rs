use std::collections::{BTreeMap, HashMap};

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{
    core::word::{from_b256, to_b256},
    error::Error,
};

/// The [`Storage`] struct represents persistent contract storage. \
/// \
/// Slots are namespaced by contract address; every slot maps a 32-byte key to a 32-byte value
/// and absent slots read as zero. The same type backs transient storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Storage {
    slots: HashMap<Address, HashMap<B256, B256>>,
}

impl Storage {
    /// Creates a new, empty [`Storage`].
    ///
    /// ```
    /// use kiln_vm::core::storage::Storage;
    ///
    /// let storage = Storage::new();
    /// assert!(storage.is_empty());
    /// ```
    pub fn new() -> Storage {
        Storage { slots: HashMap::new() }
    }

    /// Load the value stored under `key` for `address`, or the zero word if unset.
    ///
    /// ```
    /// use kiln_vm::core::storage::Storage;
    /// use alloy::primitives::{Address, B256};
    ///
    /// let mut storage = Storage::new();
    /// storage.set(Address::ZERO, B256::ZERO, &[0x02]).expect("store failed");
    ///
    /// assert_eq!(storage.get(Address::ZERO, B256::ZERO), B256::with_last_byte(0x02));
    /// assert_eq!(storage.get(Address::ZERO, B256::with_last_byte(1)), B256::ZERO);
    /// ```
    pub fn get(&self, address: Address, key: B256) -> B256 {
        self.slots.get(&address).and_then(|slots| slots.get(&key)).copied().unwrap_or_default()
    }

    /// Store `value` under `key` for `address`, left-padding values shorter than 32 bytes.
    /// Returns the previously stored value, if any.
    pub fn set(
        &mut self,
        address: Address,
        key: B256,
        value: &[u8],
    ) -> Result<Option<B256>, Error> {
        if value.len() > 32 {
            return Err(Error::InvalidStorageValueSize(value.len()));
        }

        let mut word = [0u8; 32];
        word[32 - value.len()..].copy_from_slice(value);
        Ok(self.set_word(address, key, B256::from(word)))
    }

    /// Store a full word under `key` for `address`, returning the previous value.
    pub fn set_word(&mut self, address: Address, key: B256, value: B256) -> Option<B256> {
        self.slots.entry(address).or_default().insert(key, value)
    }

    /// [`Storage::get`] with word-typed key and value.
    pub fn get_u256(&self, address: Address, key: U256) -> U256 {
        from_b256(self.get(address, to_b256(key)))
    }

    /// [`Storage::set_word`] with word-typed key and value.
    pub fn set_u256(&mut self, address: Address, key: U256, value: U256) -> Option<B256> {
        self.set_word(address, to_b256(key), to_b256(value))
    }

    /// Puts a slot back to `previous`, removing it when it was previously unset.
    pub(crate) fn restore(&mut self, address: Address, key: B256, previous: Option<B256>) {
        match previous {
            Some(value) => {
                self.set_word(address, key, value);
            }
            None => {
                if let Some(slots) = self.slots.get_mut(&address) {
                    slots.remove(&key);
                    if slots.is_empty() {
                        self.slots.remove(&address);
                    }
                }
            }
        }
    }

    /// All slots written for `address`.
    pub fn slots(&self, address: Address) -> Option<&HashMap<B256, B256>> {
        self.slots.get(&address)
    }

    /// Returns `true` when no slot has been written.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drops every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// A sorted copy of every slot, for stable output.
    pub fn to_sorted(&self) -> BTreeMap<Address, BTreeMap<B256, B256>> {
        self.slots
            .iter()
            .map(|(address, slots)| {
                (*address, slots.iter().map(|(key, value)| (*key, *value)).collect())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut storage = Storage::new();
        let address = Address::repeat_byte(0x11);

        assert_eq!(storage.set(address, B256::ZERO, &[0x01, 0x02]), Ok(None));
        assert_eq!(storage.get_u256(address, U256::ZERO), U256::from(0x0102));
        assert_eq!(storage.get(Address::ZERO, B256::ZERO), B256::ZERO);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut storage = Storage::new();
        storage.set_u256(Address::ZERO, U256::from(1), U256::from(5));
        let previous = storage.set_u256(Address::ZERO, U256::from(1), U256::from(6));
        assert_eq!(previous, Some(to_b256(U256::from(5))));
    }

    #[test]
    fn test_value_too_wide() {
        let mut storage = Storage::new();
        assert_eq!(
            storage.set(Address::ZERO, B256::ZERO, &[0u8; 33]),
            Err(Error::InvalidStorageValueSize(33))
        );
        assert!(storage.is_empty());
    }

    #[test]
    fn test_restore() {
        let mut storage = Storage::new();
        let previous = storage.set_u256(Address::ZERO, U256::from(1), U256::from(5));
        storage.restore(Address::ZERO, to_b256(U256::from(1)), previous);
        assert!(storage.is_empty());
    }
}
