// Entry point for the ledger node and its client commands
use clap::Parser;
use kilimo_ledger::{
    fetch_chain, send_transaction, BlockData, Command, Ledger, Opt, Server, SharedLedger,
    Transaction, GLOBAL_CONFIG,
};
use log::{error, info, LevelFilter};
use std::fs;
use std::process;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::StartNode { addr } => {
            if let Some(addr) = addr {
                GLOBAL_CONFIG.set_node_addr(addr);
            }
            let settings = GLOBAL_CONFIG.settings();

            // The node owns its ledger for the life of the process
            let ledger = SharedLedger::new()?;
            let server = Server::new(ledger, &settings);
            server.run(&settings.node_addr)?;
        }
        Command::Submit { sender, payload } => {
            let addr = GLOBAL_CONFIG.get_node_addr();
            // The node stamps the timestamp when the transaction arrives
            let block = send_transaction(&addr, Transaction::new(sender, payload, 0))?;
            println!("Appended block {}: {}", block.get_index(), block.get_hash());
        }
        Command::Printchain => {
            let addr = GLOBAL_CONFIG.get_node_addr();
            let ledger = fetch_chain(&addr)?;
            println!("{}", ledger.to_json_pretty()?);
        }
        Command::Validate { path } => {
            let json = fs::read_to_string(&path)?;
            let ledger = Ledger::from_json(&json)?;
            match ledger.verify() {
                Ok(()) => println!("Chain of {} block(s) is valid", ledger.block_count()),
                Err(e) => {
                    return Err(format!("{} is not a valid chain: {e}", path.display()).into());
                }
            }
        }
        Command::Demo => {
            let mut ledger = Ledger::new_ledger()?;
            ledger.append_block(Transaction::new("A", "maize:120kg", 1000).into())?;
            ledger.append_block(BlockData::new(vec![
                Transaction::new("B", "beans:40kg", 1001),
                Transaction::new("C", "coffee:15kg", 1002),
            ]))?;
            info!("Demo chain valid: {}", ledger.is_valid());
            println!("{}", ledger.to_json_pretty()?);
        }
    }
    Ok(())
}
