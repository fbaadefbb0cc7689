//! Undo log for world-state mutations.
//!
//! Every mutation of storage, transient storage, accounts or logs records enough information
//! to undo it. A [`Checkpoint`] is a position in the log: reverting to it undoes every entry
//! recorded since, newest first. Committing keeps the entries so that an enclosing checkpoint
//! can still undo them.

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

use super::state::Account;

/// One undoable mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JournalEntry {
    /// A persistent storage slot was written.
    StorageChanged {
        /// Contract whose storage changed
        address: Address,
        /// Slot key
        key: B256,
        /// Value before the write, `None` if the slot was unset
        previous: Option<B256>,
    },

    /// A transient storage slot was written.
    TransientStorageChanged {
        /// Contract whose transient storage changed
        address: Address,
        /// Slot key
        key: B256,
        /// Value before the write, `None` if the slot was unset
        previous: Option<B256>,
    },

    /// An account was created, modified or removed.
    AccountChanged {
        /// Address of the account
        address: Address,
        /// Account before the change, `None` if it did not exist
        previous: Option<Account>,
    },

    /// A log was appended.
    LogEmitted,
}

/// A position in the [`Journal`] that can be reverted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Number of journal entries recorded before this checkpoint.
    pub fn position(&self) -> usize {
        self.0
    }
}

/// A storage write as reported to step observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    /// Contract whose storage changed.
    pub address: Address,
    /// Slot key.
    pub key: U256,
    /// Value after the write.
    pub value: U256,
}

/// Append-only log of [`JournalEntry`] values.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a mutation.
    pub fn record(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// The current position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }

    /// Entries recorded since `checkpoint`, oldest first.
    pub fn since(&self, checkpoint: Checkpoint) -> &[JournalEntry] {
        self.entries.get(checkpoint.0..).unwrap_or_default()
    }

    /// Removes and returns the entries recorded since `checkpoint`, newest first.
    pub fn unwind(&mut self, checkpoint: Checkpoint) -> Vec<JournalEntry> {
        if checkpoint.0 >= self.entries.len() {
            return Vec::new();
        }
        let mut undone = self.entries.split_off(checkpoint.0);
        undone.reverse();
        undone
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwind_is_newest_first() {
        let mut journal = Journal::new();
        journal.record(JournalEntry::LogEmitted);
        let checkpoint = journal.checkpoint();
        journal.record(JournalEntry::AccountChanged { address: Address::ZERO, previous: None });
        journal.record(JournalEntry::LogEmitted);

        assert_eq!(journal.since(checkpoint).len(), 2);
        let undone = journal.unwind(checkpoint);
        assert_eq!(undone[0], JournalEntry::LogEmitted);
        assert_eq!(journal.len(), 1);
        assert!(journal.unwind(checkpoint).is_empty());
    }
}
