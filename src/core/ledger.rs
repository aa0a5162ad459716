// The append-only chain of blocks. A Ledger always holds at least the genesis
// block; every other block links to its predecessor by hash.

use crate::core::{Block, BlockData, GENESIS_PREVIOUS_HASH};
use crate::error::{LedgerError, Result};
use crate::utils::{deserialize, from_json, serialize, to_json, to_json_pretty};
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    blocks: Vec<Block>,
}

impl Ledger {
    /// Creates a ledger holding only a freshly stamped genesis block
    pub fn new_ledger() -> Result<Ledger> {
        let genesis = Block::generate_genesis_block()?;
        info!("Created genesis block: {}", genesis.get_hash());
        Ok(Ledger {
            blocks: vec![genesis],
        })
    }

    /// Rebuilds a ledger from a block sequence in chain order.
    ///
    /// Only emptiness is rejected. The blocks are taken as-is so that a
    /// tampered snapshot can still be loaded and reported by [`Ledger::verify`].
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Ledger> {
        if blocks.is_empty() {
            return Err(LedgerError::InvalidChain(
                "Ledger must contain a genesis block".to_string(),
            ));
        }
        Ok(Ledger { blocks })
    }

    /// Appends a block wrapping `payload` on top of the current tip
    pub fn append_block(&mut self, payload: BlockData) -> Result<Block> {
        let tip = self.get_tip();
        let index = tip.get_index().checked_add(1).ok_or_else(|| {
            LedgerError::InvalidChain(format!(
                "Cannot append after block index {}",
                tip.get_index()
            ))
        })?;
        let block = Block::new_block(
            index,
            payload.into_transactions(),
            tip.get_hash().to_string(),
        )?;

        info!(
            "Appended block {} with {} transaction(s): {}",
            index,
            block.get_transactions().len(),
            block.get_hash()
        );
        self.blocks.push(block.clone());
        Ok(block)
    }

    pub fn get_tip(&self) -> &Block {
        // Never empty: construction always goes through a genesis block
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn get_genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn get_block(&self, index: u64) -> Option<&Block> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.blocks.get(i))
    }

    pub fn get_blocks(&self) -> &[Block] {
        self.blocks.as_slice()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Index of the tip block
    pub fn get_height(&self) -> u64 {
        self.get_tip().get_index()
    }

    /// Checks every structural invariant and reports the first violation
    pub fn verify(&self) -> Result<()> {
        verify_blocks(&self.blocks)
    }

    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    /// Binary snapshot of the block sequence
    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(&self.blocks)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Ledger> {
        let blocks: Vec<Block> = deserialize(bytes)?;
        Self::from_blocks(blocks)
    }

    /// JSON array of block records in chain order
    pub fn to_json(&self) -> Result<String> {
        to_json(&self.blocks)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        to_json_pretty(&self.blocks)
    }

    pub fn from_json(json: &str) -> Result<Ledger> {
        let blocks: Vec<Block> = from_json(json)?;
        Self::from_blocks(blocks)
    }
}

/// Validates a block sequence as a complete chain starting at genesis
pub fn verify_blocks(blocks: &[Block]) -> Result<()> {
    let genesis = blocks
        .first()
        .ok_or_else(|| LedgerError::InvalidChain("Chain is empty".to_string()))?;

    if genesis.get_index() != 0 {
        return Err(LedgerError::InvalidChain(format!(
            "Genesis block has index {}",
            genesis.get_index()
        )));
    }
    if genesis.get_previous_hash() != GENESIS_PREVIOUS_HASH {
        return Err(LedgerError::InvalidChain(
            "Genesis block does not carry the sentinel previous hash".to_string(),
        ));
    }

    for (position, block) in blocks.iter().enumerate() {
        if !block.has_valid_hash() {
            return Err(LedgerError::InvalidChain(format!(
                "Block at position {position} has hash {} but its fields hash to {}",
                block.get_hash(),
                block.recompute_hash()
            )));
        }

        if position == 0 {
            continue;
        }
        let prev = &blocks[position - 1];
        if prev.get_index().checked_add(1) != Some(block.get_index()) {
            return Err(LedgerError::InvalidChain(format!(
                "Block at position {position} has index {} after index {}",
                block.get_index(),
                prev.get_index()
            )));
        }
        if block.get_previous_hash() != prev.get_hash() {
            return Err(LedgerError::InvalidChain(format!(
                "Block {} links to {} instead of {}",
                block.get_index(),
                block.get_previous_hash(),
                prev.get_hash()
            )));
        }
    }

    Ok(())
}
