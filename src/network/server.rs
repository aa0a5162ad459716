use crate::config::Settings;
use crate::core::{Block, BlockData, Ledger, SharedLedger, Transaction};
use crate::error::{LedgerError, Result};
use crate::network::ConnectionTracker;
use crate::utils::current_timestamp;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Deserializer;
use std::io::{BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TCP_WRITE_TIMEOUT: u64 = 5000;

/// Requests accepted by the node
#[derive(Debug, Serialize, Deserialize)]
pub enum Package {
    /// One transaction; the node stamps its timestamp on arrival
    Submit { transaction: Transaction },
    /// A caller-timestamped batch appended as a single block
    SubmitBatch { transactions: Vec<Transaction> },
    GetChain,
    Validate,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Response {
    Appended { block: Block },
    Chain { blocks: Vec<Block> },
    Validity { valid: bool },
    Error { message: String },
}

/// Serves one ledger to any number of clients, one thread per connection
pub struct Server {
    ledger: SharedLedger,
    tracker: Arc<ConnectionTracker>,
    read_timeout: Duration,
}

impl Server {
    pub fn new(ledger: SharedLedger, settings: &Settings) -> Self {
        Self {
            ledger,
            tracker: Arc::new(ConnectionTracker::new(settings.max_connections)),
            read_timeout: Duration::from_secs(settings.read_timeout_secs),
        }
    }

    pub fn get_ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Bind to `addr` and serve until the listener fails
    pub fn run(&self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| LedgerError::Network(format!("Failed to bind to {addr}: {e}")))?;

        info!(
            "Ledger node listening on {addr} (up to {} connections)",
            self.tracker.get_max_connections()
        );
        self.serve(listener)
    }

    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer_addr = match stream.peer_addr() {
                        Ok(addr) => addr,
                        Err(e) => {
                            error!("Failed to get peer address: {e}");
                            continue;
                        }
                    };

                    match self.tracker.try_record_connection(peer_addr) {
                        Ok(true) => {}
                        Ok(false) => {
                            warn!(
                                "Rejecting connection from {peer_addr}: connection limit reached"
                            );
                            let _ = stream.shutdown(Shutdown::Both);
                            continue;
                        }
                        Err(e) => {
                            error!("Failed to record connection: {e}");
                            continue;
                        }
                    }

                    let ledger = self.ledger.clone();
                    let tracker = Arc::clone(&self.tracker);
                    let read_timeout = self.read_timeout;

                    thread::spawn(move || {
                        let result =
                            Self::handle_connection(&ledger, stream, peer_addr, read_timeout);

                        if let Err(e) = tracker.record_disconnection(peer_addr) {
                            warn!("Failed to record disconnection: {e}");
                        }

                        if let Err(e) = result {
                            error!("Error handling connection from {peer_addr}: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {e}");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(
        ledger: &SharedLedger,
        stream: TcpStream,
        peer_addr: SocketAddr,
        read_timeout: Duration,
    ) -> Result<()> {
        stream
            .set_read_timeout(Some(read_timeout))
            .map_err(|e| LedgerError::Network(format!("Failed to set read timeout: {e}")))?;

        let reader = BufReader::new(&stream);
        let pkg_reader = Deserializer::from_reader(reader).into_iter::<Package>();

        for pkg in pkg_reader {
            let response = match pkg {
                Ok(pkg) => {
                    info!("Received request from {peer_addr}: {pkg:?}");
                    Self::process_package(ledger, pkg)
                }
                Err(e) if e.is_io() => {
                    info!("Closing connection from {peer_addr}: {e}");
                    break;
                }
                Err(e) => {
                    warn!("Malformed request from {peer_addr}: {e}");
                    let response = Response::Error {
                        message: format!("Malformed request: {e}"),
                    };
                    write_message(&stream, &response)?;
                    break;
                }
            };
            write_message(&stream, &response)?;
        }

        let _ = stream.shutdown(Shutdown::Both);
        Ok(())
    }

    /// Applies one request to the ledger and builds its reply
    pub fn process_package(ledger: &SharedLedger, pkg: Package) -> Response {
        let result = match pkg {
            Package::Submit { transaction } => Self::handle_submit(ledger, transaction),
            Package::SubmitBatch { transactions } => ledger
                .append(BlockData::new(transactions))
                .map(|block| Response::Appended { block }),
            Package::GetChain => ledger.snapshot().map(|snapshot| Response::Chain {
                blocks: snapshot.into_blocks(),
            }),
            Package::Validate => ledger.is_valid().map(|valid| Response::Validity { valid }),
        };

        result.unwrap_or_else(|e| {
            error!("Request failed: {e}");
            Response::Error {
                message: e.to_string(),
            }
        })
    }

    fn handle_submit(ledger: &SharedLedger, transaction: Transaction) -> Result<Response> {
        let transaction = transaction.with_timestamp(current_timestamp()?);
        let block = ledger.append(transaction.into())?;
        Ok(Response::Appended { block })
    }
}

fn write_message<T: Serialize>(mut stream: &TcpStream, message: &T) -> Result<()> {
    serde_json::to_writer(stream, message)
        .map_err(|e| LedgerError::Network(format!("Failed to send data: {e}")))?;
    stream
        .write_all(b"\n")
        .and_then(|_| stream.flush())
        .map_err(|e| LedgerError::Network(format!("Failed to send data: {e}")))
}

/// Sends one request and waits for the node's reply
fn send_package(addr: &str, pkg: &Package) -> Result<Response> {
    let socket_addr = addr
        .parse::<SocketAddr>()
        .map_err(|e| LedgerError::Network(format!("Invalid address {addr}: {e}")))?;

    let stream =
        TcpStream::connect_timeout(&socket_addr, Duration::from_millis(TCP_WRITE_TIMEOUT))
            .map_err(|e| LedgerError::Network(format!("Failed to connect to {addr}: {e}")))?;

    stream
        .set_write_timeout(Some(Duration::from_millis(TCP_WRITE_TIMEOUT)))
        .map_err(|e| LedgerError::Network(format!("Failed to set write timeout: {e}")))?;

    write_message(&stream, pkg)?;
    stream
        .shutdown(Shutdown::Write)
        .map_err(|e| LedgerError::Network(format!("Failed to finish request: {e}")))?;

    Deserializer::from_reader(BufReader::new(&stream))
        .into_iter::<Response>()
        .next()
        .ok_or_else(|| LedgerError::Network(format!("{addr} closed without replying")))?
        .map_err(|e| LedgerError::Network(format!("Failed to read reply from {addr}: {e}")))
}

fn expect_block(response: Response) -> Result<Block> {
    match response {
        Response::Appended { block } => Ok(block),
        Response::Error { message } => Err(LedgerError::Network(message)),
        other => Err(LedgerError::Network(format!("Unexpected reply: {other:?}"))),
    }
}

pub fn send_transaction(addr: &str, transaction: Transaction) -> Result<Block> {
    expect_block(send_package(addr, &Package::Submit { transaction })?)
}

pub fn send_batch(addr: &str, transactions: Vec<Transaction>) -> Result<Block> {
    expect_block(send_package(addr, &Package::SubmitBatch { transactions })?)
}

pub fn fetch_chain(addr: &str) -> Result<Ledger> {
    match send_package(addr, &Package::GetChain)? {
        Response::Chain { blocks } => Ledger::from_blocks(blocks),
        Response::Error { message } => Err(LedgerError::Network(message)),
        other => Err(LedgerError::Network(format!("Unexpected reply: {other:?}"))),
    }
}

pub fn request_validation(addr: &str) -> Result<bool> {
    match send_package(addr, &Package::Validate)? {
        Response::Validity { valid } => Ok(valid),
        Response::Error { message } => Err(LedgerError::Network(message)),
        other => Err(LedgerError::Network(format!("Unexpected reply: {other:?}"))),
    }
}
