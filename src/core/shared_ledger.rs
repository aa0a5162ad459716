use crate::core::{Block, BlockData, Ledger};
use crate::error::{LedgerError, Result};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to one ledger, shared between request handlers.
///
/// Appends hold the write lock across reading the tip and pushing the new
/// block, so two appends can never build on the same tip. Readers hold the
/// read lock and never see a half-appended block.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Result<SharedLedger> {
        Ok(Self::from_ledger(Ledger::new_ledger()?))
    }

    pub fn from_ledger(ledger: Ledger) -> SharedLedger {
        SharedLedger {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Lock("Failed to acquire read lock on ledger".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Lock("Failed to acquire write lock on ledger".to_string()))
    }

    pub fn append(&self, payload: BlockData) -> Result<Block> {
        self.write()?.append_block(payload)
    }

    /// Consistent copy of the whole chain
    pub fn snapshot(&self) -> Result<Ledger> {
        Ok(self.read()?.clone())
    }

    pub fn get_tip(&self) -> Result<Block> {
        Ok(self.read()?.get_tip().clone())
    }

    pub fn block_count(&self) -> Result<usize> {
        Ok(self.read()?.block_count())
    }

    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.read()?.is_valid())
    }

    pub fn to_json(&self) -> Result<String> {
        self.read()?.to_json()
    }
}
