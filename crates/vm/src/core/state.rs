use std::collections::{BTreeMap, HashMap};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::core::constants::BLOCKHASH_WINDOW;

/// An account in the world state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Balance in wei.
    pub balance: U256,

    /// Deployed code, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Bytes>,

    /// Number of contracts this account has created.
    pub nonce: u64,
}

impl Account {
    /// An account holding only a balance.
    pub fn with_balance(balance: U256) -> Self {
        Self { balance, ..Default::default() }
    }

    /// An account holding only code.
    pub fn with_code(code: impl Into<Bytes>) -> Self {
        Self { code: Some(code.into()), ..Default::default() }
    }

    /// The account's code, or an empty slice.
    pub fn code(&self) -> &[u8] {
        self.code.as_ref().map_or(&[][..], |code| &code[..])
    }

    /// Returns `true` for an account with no balance, no code and a zero nonce.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.code().is_empty() && self.nonce == 0
    }
}

/// The [`GlobalState`] struct maps addresses to accounts and holds recent block hashes.
///
/// Accounts that were never written read as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalState {
    accounts: HashMap<Address, Account>,
    block_hashes: HashMap<u64, B256>,
}

impl From<HashMap<Address, Account>> for GlobalState {
    fn from(accounts: HashMap<Address, Account>) -> Self {
        Self { accounts, block_hashes: HashMap::new() }
    }
}

impl GlobalState {
    /// Creates a new, empty [`GlobalState`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The account at `address`, if it exists.
    pub fn get_account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Replaces the account at `address`, returning the previous one.
    pub fn set_account(&mut self, address: Address, account: Account) -> Option<Account> {
        self.accounts.insert(address, account)
    }

    /// Removes the account at `address`, returning it.
    pub fn remove_account(&mut self, address: &Address) -> Option<Account> {
        self.accounts.remove(address)
    }

    /// Puts an account back to `previous`, deleting it when it did not exist.
    pub(crate) fn restore_account(&mut self, address: Address, previous: Option<Account>) {
        match previous {
            Some(account) => {
                self.accounts.insert(address, account);
            }
            None => {
                self.accounts.remove(&address);
            }
        }
    }

    /// Balance of `address`, zero if the account does not exist.
    ///
    /// ```
    /// use kiln_vm::core::state::{Account, GlobalState};
    /// use alloy::primitives::{Address, U256};
    ///
    /// let mut state = GlobalState::new();
    /// state.set_account(Address::ZERO, Account::with_balance(U256::from(10)));
    ///
    /// assert_eq!(state.get_balance(&Address::ZERO), U256::from(10));
    /// assert_eq!(state.get_balance(&Address::repeat_byte(1)), U256::ZERO);
    /// ```
    pub fn get_balance(&self, address: &Address) -> U256 {
        self.accounts.get(address).map(|account| account.balance).unwrap_or_default()
    }

    /// Code deployed at `address`, empty if none.
    pub fn get_code(&self, address: &Address) -> Bytes {
        self.accounts.get(address).and_then(|account| account.code.clone()).unwrap_or_default()
    }

    /// Keccak-256 of the code at `address`. Missing and empty accounts hash to zero.
    pub fn get_code_hash(&self, address: &Address) -> B256 {
        match self.accounts.get(address) {
            Some(account) if !account.is_empty() => keccak256(account.code()),
            _ => B256::ZERO,
        }
    }

    /// Records the hash of block `number`.
    pub fn set_block_hash(&mut self, number: u64, hash: B256) {
        self.block_hashes.insert(number, hash);
    }

    /// Hash of block `requested` as seen from block `current`.
    ///
    /// Only the [`BLOCKHASH_WINDOW`] blocks before `current` are visible; anything else is zero.
    /// Blocks without a recorded hash get a deterministic placeholder, the Keccak-256 of the
    /// block number as a big-endian word.
    pub fn block_hash(&self, requested: U256, current: u64) -> B256 {
        if requested >= U256::from(current) {
            return B256::ZERO;
        }
        let requested = requested.as_limbs()[0];
        if current - requested > BLOCKHASH_WINDOW {
            return B256::ZERO;
        }

        self.block_hashes
            .get(&requested)
            .copied()
            .unwrap_or_else(|| keccak256(U256::from(requested).to_be_bytes::<32>()))
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` when there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// A sorted copy of every account, for stable output.
    pub fn to_sorted(&self) -> BTreeMap<Address, Account> {
        self.accounts.iter().map(|(address, account)| (*address, account.clone())).collect()
    }
}
