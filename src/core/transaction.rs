// Transactions are opaque to the ledger: it only needs to order them, encode
// them canonically for hashing, and hand them back on inspection.

use crate::core::encoding::CanonicalWriter;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Transaction {
    sender: String,
    payload: String,
    // Seconds since the Unix epoch, assigned by whoever submits the transaction
    #[serde(default)]
    timestamp: i64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, payload: impl Into<String>, timestamp: i64) -> Self {
        Transaction {
            sender: sender.into(),
            payload: payload.into(),
            timestamp,
        }
    }

    /// Replaces the submission timestamp, as the ingestion side does when a
    /// transaction arrives without a trusted one.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_payload(&self) -> &str {
        self.payload.as_str()
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub(crate) fn write_canonical(&self, writer: &mut CanonicalWriter) {
        writer.put_str(&self.sender);
        writer.put_str(&self.payload);
        writer.put_i64(self.timestamp);
    }
}

/// The batch of transactions submitted for the next block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    transactions: Vec<Transaction>,
}

impl BlockData {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        BlockData { transactions }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }
}

impl From<Transaction> for BlockData {
    fn from(tx: Transaction) -> Self {
        BlockData::new(vec![tx])
    }
}

impl From<Vec<Transaction>> for BlockData {
    fn from(transactions: Vec<Transaction>) -> Self {
        BlockData::new(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_accessors() {
        let tx = Transaction::new("farmer-7", "maize:120kg", 1000);
        assert_eq!(tx.get_sender(), "farmer-7");
        assert_eq!(tx.get_payload(), "maize:120kg");
        assert_eq!(tx.get_timestamp(), 1000);
    }

    #[test]
    fn test_with_timestamp_overrides() {
        let tx = Transaction::new("a", "b", 0).with_timestamp(1700000000);
        assert_eq!(tx.get_timestamp(), 1700000000);
    }

    #[test]
    fn test_missing_timestamp_defaults_to_zero() {
        let tx: Transaction =
            serde_json::from_str(r#"{"sender":"coop-1","payload":"beans"}"#).unwrap();
        assert_eq!(tx.get_timestamp(), 0);
        assert_eq!(tx.get_sender(), "coop-1");
    }

    #[test]
    fn test_block_data_conversions() {
        let single: BlockData = Transaction::new("a", "x", 1).into();
        assert_eq!(single.len(), 1);

        let batch: BlockData = vec![
            Transaction::new("b", "y", 2),
            Transaction::new("c", "z", 3),
        ]
        .into();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get_transactions()[1].get_sender(), "c");

        assert!(BlockData::empty().is_empty());
    }
}
