//! Transaction and block context of an execution.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::core::constants::{
    DEFAULT_BLOB_BASE_FEE, DEFAULT_BLOCK_GAS_LIMIT, DEFAULT_CHAIN_ID, DEFAULT_GAS_LIMIT,
};

/// The transaction that starts an execution. Unset fields default to the zero address, zero
/// value and empty calldata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxData {
    /// Address of the executing contract.
    pub to: Address,

    /// Direct caller of the top-level frame.
    pub from: Address,

    /// Externally owned account that signed the transaction.
    pub origin: Address,

    /// Wei sent along with the call.
    pub value: U256,

    /// Gas price reported by GASPRICE.
    pub gas_price: U256,

    /// Gas allowance reported by GAS. It is never consumed.
    pub gas_limit: u64,

    /// Calldata.
    pub data: Bytes,
}

impl Default for TxData {
    fn default() -> Self {
        Self {
            to: Address::ZERO,
            from: Address::ZERO,
            origin: Address::ZERO,
            value: U256::ZERO,
            gas_price: U256::ZERO,
            gas_limit: DEFAULT_GAS_LIMIT,
            data: Bytes::new(),
        }
    }
}

/// The block an execution runs in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockData {
    /// Block height, used by NUMBER and BLOCKHASH.
    pub number: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Beneficiary of the block.
    pub coinbase: Address,
    /// Also served as PREVRANDAO.
    pub difficulty: U256,
    /// Block gas limit.
    pub gas_limit: u64,
    /// Chain id.
    pub chain_id: u64,
    /// Base fee per gas.
    pub base_fee: U256,
    /// Blob base fee per gas.
    pub blob_base_fee: U256,
}

impl Default for BlockData {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            coinbase: Address::ZERO,
            difficulty: U256::ZERO,
            gas_limit: DEFAULT_BLOCK_GAS_LIMIT,
            chain_id: DEFAULT_CHAIN_ID,
            base_fee: U256::ZERO,
            blob_base_fee: U256::from(DEFAULT_BLOB_BASE_FEE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_block_json() {
        let block: BlockData =
            serde_json::from_str(r#"{"number": 17, "chainId": 5}"#).expect("failed to parse");
        assert_eq!(block.number, 17);
        assert_eq!(block.chain_id, 5);
        assert_eq!(block.gas_limit, DEFAULT_BLOCK_GAS_LIMIT);
        assert_eq!(block.blob_base_fee, U256::from(1));
    }

    #[test]
    fn test_default_tx() {
        let tx = TxData::default();
        assert_eq!(tx.gas_limit, u64::MAX);
        assert!(tx.data.is_empty());
    }
}
