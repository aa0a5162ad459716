//! Core ledger functionality
//!
//! Transactions, the canonical encoding used for hashing, blocks, the
//! append-only ledger, and the lock-guarded handle shared by request handlers.

pub mod block;
pub mod encoding;
pub mod ledger;
pub mod shared_ledger;
pub mod transaction;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use encoding::{encode_block_fields, CanonicalWriter};
pub use ledger::{verify_blocks, Ledger};
pub use shared_ledger::SharedLedger;
pub use transaction::{BlockData, Transaction};
