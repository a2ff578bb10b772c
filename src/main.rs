use::std::env;
use::std::process;

use multisig_vault::{run, VaultConfig};
use env_logger;
use log::info;

fn main() {
    // Expecting the owner list, the confirmation quorum and the call script
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: {} <owner,owner,...> <required-confirmations> <calls.csv>", args[0]);
        process::exit(1);
    }
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    let config = match VaultConfig::from_args(&args[1..]) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!(
        "starting vault with {} owners, {} confirmations required, calls from {}",
        config.owners.len(),
        config.required_confirmations,
        config.calls_path.display()
    );

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
