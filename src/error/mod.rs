//! Error handling for the ledger
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is the [`LedgerError`] enum defined here.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
    /// Network communication errors
    Network(String),
    /// A chain that breaks linkage, indexing or hash invariants
    InvalidChain(String),
    /// System clock could not produce a Unix timestamp
    Clock(String),
    /// A ledger lock was poisoned by a panicking writer
    Lock(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Network(msg) => write!(f, "Network error: {msg}"),
            LedgerError::InvalidChain(msg) => write!(f, "Invalid chain: {msg}"),
            LedgerError::Clock(msg) => write!(f, "Clock error: {msg}"),
            LedgerError::Lock(msg) => write!(f, "Lock error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for LedgerError {
    fn from(err: bincode::error::EncodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for LedgerError {
    fn from(err: bincode::error::DecodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = LedgerError::InvalidChain("block 2 hash mismatch".to_string());
        assert_eq!(err.to_string(), "Invalid chain: block 2 hash mismatch");

        let err = LedgerError::Lock("poisoned".to_string());
        assert_eq!(err.to_string(), "Lock error: poisoned");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing snapshot");
        let err: LedgerError = io.into();
        assert!(matches!(err, LedgerError::Io(ref msg) if msg.contains("missing snapshot")));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<Vec<u64>>("[1, 2,").unwrap_err();
        let err: LedgerError = parse.into();
        assert!(matches!(err, LedgerError::Serialization(_)));
    }
}
