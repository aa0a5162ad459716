use crate::core::encoding::encode_block_fields;
use crate::core::Transaction;
use crate::error::Result;
use crate::utils::{current_timestamp, deserialize, serialize, sha256_hex};
use log::debug;
use serde::{Deserialize, Serialize};

/// Previous-hash value carried by the genesis block. Real hashes are always
/// 64 hex characters, so the empty string can never collide with one.
pub const GENESIS_PREVIOUS_HASH: &str = "";

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Block {
    index: u64,
    timestamp: i64,
    transactions: Vec<Transaction>,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Builds a block stamped with the current time.
    ///
    /// Index and previous hash are taken as given; checking them against the
    /// chain tip is the ledger's job.
    pub fn new_block(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: String,
    ) -> Result<Block> {
        let timestamp = current_timestamp()?;
        Ok(Self::new_block_at(
            index,
            timestamp,
            transactions,
            previous_hash,
        ))
    }

    /// Builds a block with an explicit creation timestamp
    pub fn new_block_at(
        index: u64,
        timestamp: i64,
        transactions: Vec<Transaction>,
        previous_hash: String,
    ) -> Block {
        let hash = Self::calculate_hash(index, timestamp, &transactions, &previous_hash);
        debug!(
            "Built block {index} with {} transaction(s): {hash}",
            transactions.len()
        );
        Block {
            index,
            timestamp,
            transactions,
            previous_hash,
            hash,
        }
    }

    pub fn generate_genesis_block() -> Result<Block> {
        Block::new_block(0, Vec::new(), String::from(GENESIS_PREVIOUS_HASH))
    }

    /// SHA-256 over the canonical encoding of the hashed fields, as lowercase hex
    pub fn calculate_hash(
        index: u64,
        timestamp: i64,
        transactions: &[Transaction],
        previous_hash: &str,
    ) -> String {
        sha256_hex(&encode_block_fields(
            index,
            timestamp,
            transactions,
            previous_hash,
        ))
    }

    /// Recomputes the hash from the stored fields
    pub fn recompute_hash(&self) -> String {
        Self::calculate_hash(
            self.index,
            self.timestamp,
            &self.transactions,
            &self.previous_hash,
        )
    }

    pub fn has_valid_hash(&self) -> bool {
        self.recompute_hash() == self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }
}
