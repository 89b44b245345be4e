//! Message and block context for a kernel run

use bytes::Bytes;
use ewasm_primitives::{keccak256, Address, Gas, H256};
use serde::{Deserialize, Serialize};

/// State path holding the serialized [`Block`]
pub const BLOCK_PATH: &str = "block";

/// State path holding the serialized [`FakeBlockchain`]
pub const BLOCKCHAIN_PATH: &str = "blockchain";

/// State path under which account vertices live
pub const ACCOUNTS_PATH: &str = "accounts";

/// Message dispatched to a contract
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// Sender of the message
    pub caller: Address,
    /// Call data
    pub data: Bytes,
    /// Gas budget
    pub gas: Gas,
}

impl Message {
    /// Create a new message
    pub fn new(caller: Address, data: impl Into<Bytes>, gas: Gas) -> Self {
        Self {
            caller,
            data: data.into(),
            gas,
        }
    }
}

/// Block header fields visible to contracts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockHeader {
    /// Block coinbase (miner/validator)
    pub coinbase: Address,
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
    /// Block gas limit
    pub gas_limit: Gas,
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            coinbase: Address::ZERO,
            number: 0,
            timestamp: 0,
            gas_limit: 30_000_000,
        }
    }
}

/// Block stored under [`BLOCK_PATH`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    /// Header
    pub header: BlockHeader,
}

impl Block {
    /// Create a block with the given coinbase
    pub fn with_coinbase(coinbase: Address) -> Self {
        Self {
            header: BlockHeader {
                coinbase,
                ..BlockHeader::default()
            },
        }
    }
}

/// Stand-in chain history stored under [`BLOCKCHAIN_PATH`]
///
/// Block hashes are synthesized: the hash of block `n` is the keccak256 of
/// the decimal string of `n`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeBlockchain {}

impl FakeBlockchain {
    /// Hash of block `number`
    pub fn block_hash(&self, number: u64) -> H256 {
        keccak256(number.to_string().as_bytes())
    }
}
