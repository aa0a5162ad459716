//! Utility functions and helpers
//!
//! Hashing, clock access, and the bincode/JSON helpers used throughout the
//! ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, sha256_digest, sha256_hex};

pub use serialization::{deserialize, from_json, serialize, to_json, to_json_pretty};
