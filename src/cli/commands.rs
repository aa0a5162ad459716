use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kilimo-ledger")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "startnode", about = "Start a ledger node")]
    StartNode {
        #[arg(long = "addr", help = "Listen address, overrides NODE_ADDRESS")]
        addr: Option<String>,
    },
    #[command(name = "submit", about = "Submit a transaction to a running node")]
    Submit {
        #[arg(help = "Who is submitting the transaction")]
        sender: String,
        #[arg(help = "Transaction payload")]
        payload: String,
    },
    #[command(name = "printchain", about = "Print all blocks held by a running node")]
    Printchain,
    #[command(name = "validate", about = "Check a saved chain snapshot (JSON)")]
    Validate {
        #[arg(help = "Path to a snapshot written by printchain")]
        path: PathBuf,
    },
    #[command(name = "demo", about = "Build a small chain in memory and print it")]
    Demo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit() {
        let opt =
            Opt::try_parse_from(["kilimo-ledger", "submit", "farmer-1", "maize:50kg"]).unwrap();
        match opt.command {
            Command::Submit { sender, payload } => {
                assert_eq!(sender, "farmer-1");
                assert_eq!(payload, "maize:50kg");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_startnode_addr() {
        let opt =
            Opt::try_parse_from(["kilimo-ledger", "startnode", "--addr", "0.0.0.0:9000"]).unwrap();
        match opt.command {
            Command::StartNode { addr } => assert_eq!(addr.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_validate_requires_path() {
        assert!(Opt::try_parse_from(["kilimo-ledger", "validate"]).is_err());
    }
}
