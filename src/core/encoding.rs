//! Canonical byte layout used to compute block hashes.
//!
//! The layout is fixed so that any implementation, in any language, hashing
//! the same block fields gets the same digest. All integers are big-endian.
//! Strings are written as a `u64` byte length followed by their UTF-8 bytes,
//! which keeps adjacent fields from running into each other.
//!
//! ```text
//! u64  index
//! i64  timestamp
//! u64  transaction count
//!      for each transaction, in block order:
//!      str  sender
//!      str  payload
//!      i64  timestamp
//! str  previous_hash
//! ```

use crate::core::Transaction;

/// Append-only buffer that writes values in the canonical layout
#[derive(Debug, Default)]
pub struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend(value.to_be_bytes());
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.extend(value.to_be_bytes());
    }

    pub fn put_str(&mut self, value: &str) {
        self.put_u64(value.len() as u64);
        self.buf.extend(value.as_bytes());
    }

    pub fn put_transactions(&mut self, transactions: &[Transaction]) {
        self.put_u64(transactions.len() as u64);
        for tx in transactions {
            tx.write_canonical(self);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Encodes the four hashed block fields in canonical order
pub fn encode_block_fields(
    index: u64,
    timestamp: i64,
    transactions: &[Transaction],
    previous_hash: &str,
) -> Vec<u8> {
    let mut writer = CanonicalWriter::new();
    writer.put_u64(index);
    writer.put_i64(timestamp);
    writer.put_transactions(transactions);
    writer.put_str(previous_hash);
    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block_layout() {
        let bytes = encode_block_fields(0, 5, &[], "");
        let mut expected = Vec::new();
        expected.extend(0u64.to_be_bytes());
        expected.extend(5i64.to_be_bytes());
        expected.extend(0u64.to_be_bytes());
        expected.extend(0u64.to_be_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_transaction_layout() {
        let tx = Transaction::new("A", "hi", 1000);
        let bytes = encode_block_fields(1, 2, &[tx], "ff");

        let mut expected = Vec::new();
        expected.extend(1u64.to_be_bytes());
        expected.extend(2i64.to_be_bytes());
        expected.extend(1u64.to_be_bytes());
        expected.extend(1u64.to_be_bytes());
        expected.extend(b"A");
        expected.extend(2u64.to_be_bytes());
        expected.extend(b"hi");
        expected.extend(1000i64.to_be_bytes());
        expected.extend(2u64.to_be_bytes());
        expected.extend(b"ff");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_length_prefix_separates_fields() {
        // Same concatenated text, different field boundaries
        let left = encode_block_fields(1, 1, &[Transaction::new("ab", "c", 0)], "");
        let right = encode_block_fields(1, 1, &[Transaction::new("a", "bc", 0)], "");
        assert_ne!(left, right);
    }

    #[test]
    fn test_order_is_preserved() {
        let a = Transaction::new("a", "1", 1);
        let b = Transaction::new("b", "2", 2);
        let forward = encode_block_fields(1, 1, &[a.clone(), b.clone()], "");
        let reversed = encode_block_fields(1, 1, &[b, a], "");
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_negative_timestamp_uses_twos_complement() {
        let bytes = encode_block_fields(0, -1, &[], "");
        assert_eq!(&bytes[8..16], &[0xFF; 8]);
    }
}
