use crate::error::{LedgerError, Result};
use log::{debug, info};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::RwLock;

/// Tracks open client connections and enforces the connection cap
pub struct ConnectionTracker {
    connected: RwLock<HashSet<SocketAddr>>,
    max_connections: usize,
}

impl ConnectionTracker {
    pub fn new(max_connections: usize) -> Self {
        Self {
            connected: RwLock::new(HashSet::new()),
            max_connections,
        }
    }

    /// Records the connection if there is room for it.
    ///
    /// Check and insert happen under one write lock so two racing accepts
    /// cannot both take the last slot.
    pub fn try_record_connection(&self, address: SocketAddr) -> Result<bool> {
        let mut connected = self
            .connected
            .write()
            .map_err(|e| LedgerError::Network(format!("Failed to acquire connection lock: {e}")))?;

        if connected.len() >= self.max_connections {
            return Ok(false);
        }
        connected.insert(address);
        info!("Client connected: {address}");
        Ok(true)
    }

    pub fn record_disconnection(&self, address: SocketAddr) -> Result<()> {
        let mut connected = self
            .connected
            .write()
            .map_err(|e| LedgerError::Network(format!("Failed to acquire connection lock: {e}")))?;

        connected.remove(&address);
        debug!("Client disconnected: {address}");
        Ok(())
    }

    pub fn get_connected_count(&self) -> Result<usize> {
        let connected = self
            .connected
            .read()
            .map_err(|e| LedgerError::Network(format!("Failed to acquire connection lock: {e}")))?;
        Ok(connected.len())
    }

    pub fn get_max_connections(&self) -> usize {
        self.max_connections
    }
}
