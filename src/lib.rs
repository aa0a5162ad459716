//! # Kilimo Ledger
//!
//! An in-memory, hash-chained transaction ledger. Each block holds a batch of
//! transactions and the SHA-256 hash of its predecessor, starting from a fixed
//! genesis block.
//!
//! ## Layout
//! - `core/`: transactions, canonical hash encoding, blocks, the ledger and
//!   its lock-guarded shared handle
//! - `network/`: TCP service through which callers submit transactions and
//!   read the chain back
//! - `config/`: node settings from defaults, a TOML file and the environment
//! - `utils/`: hashing, clock and serialization helpers
//! - `cli/`: command-line parsing for the node binary
//!
//! Hashes never depend on serde or bincode output. They are computed over the
//! byte layout documented in [`core::encoding`].

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod utils;

pub use cli::{Command, Opt};
pub use config::{Config, Settings, GLOBAL_CONFIG};
pub use crate::core::{
    verify_blocks, Block, BlockData, Ledger, SharedLedger, Transaction, GENESIS_PREVIOUS_HASH,
};
pub use error::{LedgerError, Result};
pub use network::{
    fetch_chain, request_validation, send_batch, send_transaction, ConnectionTracker, Server,
};
pub use utils::{current_timestamp, sha256_digest, sha256_hex};
