//! Submission and inspection service
//!
//! A small TCP service that lets outside callers submit transactions to a
//! node's ledger and read the chain back. Messages are JSON values on the
//! stream, one response per request.

pub mod connection_tracker;
pub mod server;

pub use connection_tracker::ConnectionTracker;
pub use server::{
    fetch_chain, request_validation, send_batch, send_transaction, Package, Response, Server,
};
