//! Transaction-global state shared by every frame of one execution.

use alloy::primitives::{Address, Bytes, U256};

use crate::{
    core::{
        journal::{Checkpoint, Journal, JournalEntry, StorageChange},
        log::Log,
        state::{Account, GlobalState},
        storage::Storage,
        word::{from_b256, to_b256},
    },
    error::Error,
};

/// The [`World`] struct holds everything a call tree shares: accounts, persistent and transient
/// storage, emitted logs, and the journal that makes all of them revertible.
///
/// Frames never mutate these directly; every write goes through a method here so that it is
/// journaled.
#[derive(Clone, Debug, Default)]
pub struct World {
    state: GlobalState,
    storage: Storage,
    transient: Storage,
    logs: Vec<Log>,
    journal: Journal,
    steps: u64,
    nested_frames: usize,
}

impl World {
    /// Creates a new [`World`] from an initial account map and storage.
    pub fn new(state: GlobalState, storage: Storage) -> Self {
        Self { state, storage, ..Default::default() }
    }

    /// The account map.
    pub fn state(&self) -> &GlobalState {
        &self.state
    }

    /// Persistent storage.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Logs emitted so far.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Instructions executed so far, across the whole call tree.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Counts one executed instruction, failing once more than `limit` have run.
    pub(crate) fn tick(&mut self, limit: u64) -> Result<(), Error> {
        if self.steps >= limit {
            return Err(Error::StepLimitExceeded(limit));
        }
        self.steps += 1;
        Ok(())
    }

    /// Number of frames currently running below the outermost one.
    pub fn nested_frames(&self) -> usize {
        self.nested_frames
    }

    /// Records that a child frame was entered, returning its depth.
    pub(crate) fn enter_frame(&mut self) -> usize {
        self.nested_frames += 1;
        self.nested_frames
    }

    /// Records that the innermost child frame returned.
    pub(crate) fn leave_frame(&mut self) -> Result<(), Error> {
        self.nested_frames = self.nested_frames.checked_sub(1).ok_or(Error::CallDepthUnderflow)?;
        Ok(())
    }

    /// Opens a checkpoint.
    pub fn checkpoint(&self) -> Checkpoint {
        self.journal.checkpoint()
    }

    /// Keeps every change made since `checkpoint`.
    ///
    /// The journal is left untouched: an enclosing checkpoint must still be able to revert
    /// these entries. Only the outermost [`World::revert`] or [`World::into_parts`] ends their
    /// lifetime.
    pub fn commit(&self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.position() <= self.journal.len(), "checkpoint from the future");
    }

    /// Undoes every change made since `checkpoint`.
    pub fn revert(&mut self, checkpoint: Checkpoint) {
        for entry in self.journal.unwind(checkpoint) {
            match entry {
                JournalEntry::StorageChanged { address, key, previous } => {
                    self.storage.restore(address, key, previous)
                }
                JournalEntry::TransientStorageChanged { address, key, previous } => {
                    self.transient.restore(address, key, previous)
                }
                JournalEntry::AccountChanged { address, previous } => {
                    self.state.restore_account(address, previous)
                }
                JournalEntry::LogEmitted => {
                    self.logs.pop();
                }
            }
        }
    }

    /// Persistent storage slot `key` of `address`.
    pub fn sload(&self, address: Address, key: U256) -> U256 {
        self.storage.get_u256(address, key)
    }

    /// Writes persistent storage slot `key` of `address`.
    pub fn sstore(&mut self, address: Address, key: U256, value: U256) {
        let previous = self.storage.set_u256(address, key, value);
        self.journal.record(JournalEntry::StorageChanged { address, key: to_b256(key), previous });
    }

    /// Transient storage slot `key` of `address`.
    pub fn tload(&self, address: Address, key: U256) -> U256 {
        self.transient.get_u256(address, key)
    }

    /// Writes transient storage slot `key` of `address`.
    pub fn tstore(&mut self, address: Address, key: U256, value: U256) {
        let previous = self.transient.set_u256(address, key, value);
        self.journal.record(JournalEntry::TransientStorageChanged {
            address,
            key: to_b256(key),
            previous,
        });
    }

    /// Replaces the account at `address`.
    pub fn set_account(&mut self, address: Address, account: Account) {
        let previous = self.state.set_account(address, account);
        self.journal.record(JournalEntry::AccountChanged { address, previous });
    }

    /// Applies `update` to the account at `address`, creating it if needed.
    fn modify_account(&mut self, address: Address, update: impl FnOnce(&mut Account)) {
        let mut account = self.state.get_account(&address).cloned().unwrap_or_default();
        update(&mut account);
        self.set_account(address, account);
    }

    /// Deploys `code` at `address`.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        self.modify_account(address, |account| account.code = Some(code));
    }

    /// Increments the nonce of `address`, returning the value before the increment.
    pub fn increment_nonce(&mut self, address: Address) -> u64 {
        let nonce = self.state.get_account(&address).map(|account| account.nonce).unwrap_or(0);
        self.modify_account(address, |account| account.nonce = nonce.wrapping_add(1));
        nonce
    }

    /// Moves `value` wei from `from` to `to`. Returns `false`, changing nothing, when `from`
    /// cannot cover it.
    pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> bool {
        if value.is_zero() {
            return true;
        }

        let balance = self.state.get_balance(&from);
        if balance < value {
            return false;
        }
        if from == to {
            return true;
        }

        self.modify_account(from, |account| account.balance = balance - value);
        self.modify_account(to, |account| account.balance = account.balance.wrapping_add(value));
        true
    }

    /// Sends the whole balance of `address` to `beneficiary` and removes the account.
    pub fn destroy(&mut self, address: Address, beneficiary: Address) {
        let balance = self.state.get_balance(&address);
        if beneficiary != address && !balance.is_zero() {
            self.modify_account(beneficiary, |account| {
                account.balance = account.balance.wrapping_add(balance)
            });
        }

        let previous = self.state.remove_account(&address);
        if previous.is_some() {
            self.journal.record(JournalEntry::AccountChanged { address, previous });
        }
    }

    /// Appends a log.
    pub fn emit(&mut self, log: Log) {
        self.logs.push(log);
        self.journal.record(JournalEntry::LogEmitted);
    }

    /// Storage writes made since `checkpoint`, with their current values.
    pub fn storage_changes_since(&self, checkpoint: Checkpoint) -> Vec<StorageChange> {
        self.journal
            .since(checkpoint)
            .iter()
            .filter_map(|entry| match entry {
                JournalEntry::StorageChanged { address, key, .. } => Some(StorageChange {
                    address: *address,
                    key: from_b256(*key),
                    value: from_b256(self.storage.get(*address, *key)),
                }),
                _ => None,
            })
            .collect()
    }

    /// Consumes the world, returning accounts, persistent storage and logs.
    pub fn into_parts(self) -> (GlobalState, Storage, Vec<Log>) {
        (self.state, self.storage, self.logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded(address: Address, balance: u64) -> World {
        let mut state = GlobalState::new();
        state.set_account(address, Account::with_balance(U256::from(balance)));
        World::new(state, Storage::new())
    }

    #[test]
    fn test_revert_restores_everything() {
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let mut world = funded(alice, 100);

        world.sstore(alice, U256::from(1), U256::from(1));
        let checkpoint = world.checkpoint();
        world.sstore(alice, U256::from(1), U256::from(2));
        world.sstore(alice, U256::from(2), U256::from(3));
        world.tstore(alice, U256::from(1), U256::from(4));
        assert!(world.transfer(alice, bob, U256::from(40)));
        world.emit(Log::new(alice, vec![], &[]));
        world.increment_nonce(alice);

        world.revert(checkpoint);
        assert_eq!(world.sload(alice, U256::from(1)), U256::from(1));
        assert_eq!(world.sload(alice, U256::from(2)), U256::ZERO);
        assert_eq!(world.tload(alice, U256::from(1)), U256::ZERO);
        assert_eq!(world.state().get_balance(&alice), U256::from(100));
        assert!(world.state().get_account(&bob).is_none());
        assert_eq!(world.state().get_account(&alice).map(|a| a.nonce), Some(0));
        assert!(world.logs().is_empty());
    }

    #[test]
    fn test_nested_commit_is_reverted_by_outer() {
        let alice = Address::repeat_byte(0xa1);
        let mut world = funded(alice, 0);

        let outer = world.checkpoint();
        let inner = world.checkpoint();
        world.sstore(alice, U256::ZERO, U256::from(7));
        world.commit(inner);
        assert_eq!(world.sload(alice, U256::ZERO), U256::from(7));

        world.revert(outer);
        assert_eq!(world.sload(alice, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let mut world = funded(alice, 10);

        assert!(!world.transfer(alice, bob, U256::from(11)));
        assert_eq!(world.state().get_balance(&alice), U256::from(10));
        assert!(world.transfer(alice, bob, U256::ZERO));
        assert!(world.state().get_account(&bob).is_none());
    }

    #[test]
    fn test_destroy() {
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let mut world = funded(alice, 10);

        let checkpoint = world.checkpoint();
        world.destroy(alice, bob);
        assert!(world.state().get_account(&alice).is_none());
        assert_eq!(world.state().get_balance(&bob), U256::from(10));

        world.revert(checkpoint);
        assert_eq!(world.state().get_balance(&alice), U256::from(10));
        assert!(world.state().get_account(&bob).is_none());
    }

    #[test]
    fn test_step_limit() {
        let mut world = World::default();
        assert!(world.tick(2).is_ok());
        assert!(world.tick(2).is_ok());
        assert_eq!(world.tick(2), Err(Error::StepLimitExceeded(2)));
        assert_eq!(world.steps(), 2);
    }

    #[test]
    fn test_frame_nesting() {
        let mut world = World::default();
        assert_eq!(world.enter_frame(), 1);
        assert_eq!(world.enter_frame(), 2);
        assert!(world.leave_frame().is_ok());
        assert_eq!(world.nested_frames(), 1);
        assert!(world.leave_frame().is_ok());
        assert_eq!(world.leave_frame(), Err(Error::CallDepthUnderflow));
        assert_eq!(world.nested_frames(), 0);
    }

    #[test]
    fn test_storage_changes_since() {
        let alice = Address::repeat_byte(0xa1);
        let mut world = World::default();
        world.sstore(alice, U256::from(1), U256::from(1));

        let checkpoint = world.checkpoint();
        world.sstore(alice, U256::from(2), U256::from(9));
        assert_eq!(
            world.storage_changes_since(checkpoint),
            vec![StorageChange { address: alice, key: U256::from(2), value: U256::from(9) }]
        );
    }
}
